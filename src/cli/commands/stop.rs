use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::TrackLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::formatting::secs2readable;
use crate::utils::time::delta_seconds;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop { id } = cmd {
        let mut pool = DbPool::open_initialized(cfg.database_path())?;

        if let Some(prev) = crate::db::queries::load_task(&pool.conn, *id)?
            && !prev.is_running()
        {
            warning(format!("Task {} was already stopped; end time overwritten", id));
        }

        let task = TrackLogic::stop(&mut pool, *id)?;
        let elapsed = task
            .end_time
            .map(|end| delta_seconds(end - task.start_time))
            .unwrap_or(0.0);

        success(format!(
            "Task {} stopped after {}",
            task.id,
            secs2readable(elapsed)
        ));
    }

    Ok(())
}
