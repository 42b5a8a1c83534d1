mod auth;
mod projects;
mod settings;

pub use auth::AuthRepository;
pub use projects::ProjectsRepository;
pub use settings::SettingsRepository;
