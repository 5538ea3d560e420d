use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn schedule_path(&self) -> PathBuf;
    fn bind_address(&self) -> String;
    fn admin_password(&self) -> String;
    fn window_days(&self) -> u32;
    fn seed_year(&self) -> i32;
}
