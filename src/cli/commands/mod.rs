pub mod acc;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod serve;
pub mod stop;
pub mod times;
pub mod track;
