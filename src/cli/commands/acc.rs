use crate::cli::parser::{AccCommands, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::account::LookupField;
use crate::store::json_file::to_sorted_pretty;
use crate::store::{AccountStore, ReadingsLog};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let bytes = to_sorted_pretty(value)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Acc { action } = cmd {
        match action {
            AccCommands::List => {
                let store = AccountStore::open(cfg.accounts_path());
                print_json(&store.list_all()?)?;
            }
            AccCommands::Get { info, hepek, user } => {
                let (field, value) = match (info, hepek, user) {
                    (Some(v), _, _) => (LookupField::Info, v),
                    (_, Some(v), _) => (LookupField::Hepek, v),
                    (_, _, Some(v)) => (LookupField::User, v),
                    _ => {
                        return Err(AppError::InvalidInput(
                            "one of --info, --hepek or --user is required".into(),
                        ));
                    }
                };

                let store = AccountStore::open(cfg.accounts_path());
                print_json(&store.lookup(field, value)?)?;
            }
            AccCommands::Readings { info, hepek } => {
                let log = ReadingsLog::open(cfg.readings_path(), cfg.readings_capacity);
                print_json(&log.entries(&format!("{info}_{hepek}"))?)?;
            }
        }
    }

    Ok(())
}
