use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Track { user_id } = cmd {
        let mut pool = DbPool::open_initialized(cfg.database_path())?;
        let id = TrackLogic::track(&mut pool, *user_id)?;

        success(format!("Task {} started for user {}", id, user_id));
    }

    Ok(())
}
