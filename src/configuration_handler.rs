use crate::configuration::Configuration;
use chrono::Datelike;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(about = "Single-resource appointment booking service")]
pub struct ConfigurationHandler {
    /// Schedule file holding the calendar; a fresh year is seeded when the
    /// file does not exist yet
    #[arg(long, default_value = "schedule.json")]
    schedule_file: PathBuf,

    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Password for the operator endpoints
    #[arg(long, default_value = "123")]
    admin_password: String,

    /// How many days ahead the date picker looks, today included
    #[arg(long, default_value_t = 7)]
    window_days: u32,

    /// Year to seed when the schedule file is missing; defaults to the
    /// current year
    #[arg(long)]
    seed_year: Option<i32>,
}

impl Configuration for ConfigurationHandler {
    fn schedule_path(&self) -> PathBuf {
        self.schedule_file.clone()
    }

    fn bind_address(&self) -> String {
        self.bind.clone()
    }

    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn window_days(&self) -> u32 {
        self.window_days
    }

    fn seed_year(&self) -> i32 {
        self.seed_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}
