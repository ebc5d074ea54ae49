pub mod command;
pub mod config;
pub mod plot;

pub mod core {
    pub mod ballistics;
    pub mod missile;
    pub mod window;
}
