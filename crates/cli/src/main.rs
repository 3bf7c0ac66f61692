use clap::{Parser, Subcommand};
use records_core::{
    config::records_file_from_env_value, CoreConfig, JsonFileStore, Patient, PatientDraft,
    PatientPatch, PatientService,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "records")]
#[command(about = "Patient records CLI")]
struct Cli {
    /// Collection file (defaults to PATIENT_RECORDS_FILE, then patients.json)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty collection file if none exists
    Init,
    /// List all patients (stored fields only)
    List,
    /// Show one patient's stored fields
    Get {
        /// Patient id
        id: String,
    },
    /// List patients sorted by height, weight or bmi
    Sort {
        /// Field to sort by: height, weight or bmi
        field: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Create a patient
    Create {
        /// Patient id
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        age: i64,
        /// male, female or other
        #[arg(long)]
        gender: String,
        /// Height in meters
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
    },
    /// Update some fields of a patient
    Update {
        /// Patient id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let records_file = cli.file.unwrap_or_else(|| {
        records_file_from_env_value(std::env::var("PATIENT_RECORDS_FILE").ok())
    });
    let cfg = CoreConfig::new(records_file)?;
    let service = PatientService::from_config(&cfg);

    match cli.command {
        Some(Commands::Init) => {
            let store = JsonFileStore::new(cfg.records_file());
            if store.initialise()? {
                println!("Created {}", cfg.records_file().display());
            } else {
                println!("{} already exists", cfg.records_file().display());
            }
        }
        Some(Commands::List) => {
            let collection = service.list()?;
            if collection.is_empty() {
                println!("No patients found.");
            } else {
                println!("{}", collection.to_json()?);
            }
        }
        Some(Commands::Get { id }) => {
            let patient = service.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&patient.stored_fields())?);
        }
        Some(Commands::Sort { field, order }) => {
            let sorted = service.sort(Some(field.as_str()), Some(order.as_str()))?;
            let rows: Vec<_> = sorted.iter().map(with_metrics).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Some(Commands::Create {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        }) => {
            let draft = PatientDraft {
                name: Some(name),
                city: Some(city),
                age: Some(age),
                gender: Some(gender),
                height: Some(height),
                weight: Some(weight),
            };
            let patient = service.create(&id, draft)?;
            println!(
                "Created patient {} (bmi {}, {})",
                patient.id(),
                patient.bmi(),
                patient.verdict()
            );
        }
        Some(Commands::Update {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        }) => {
            let patch = PatientPatch {
                name,
                city,
                age,
                gender,
                height,
                weight,
            };
            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            let patient = service.update(&id, patch)?;
            println!(
                "Updated patient {} (bmi {}, {})",
                patient.id(),
                patient.bmi(),
                patient.verdict()
            );
        }
        None => {
            println!("Use 'records --help' for commands");
        }
    }

    Ok(())
}

fn with_metrics(patient: &Patient) -> serde_json::Value {
    let fields = patient.stored_fields();
    json!({
        "id": patient.id(),
        "name": fields.name,
        "city": fields.city,
        "age": fields.age,
        "gender": fields.gender,
        "height": fields.height,
        "weight": fields.weight,
        "bmi": patient.bmi(),
        "verdict": patient.verdict(),
    })
}
