mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod artist_form;
pub use artist_form::ArtistForm;

mod artists;
pub use artists::ArtistsView;

mod dashboard;
pub use dashboard::DashboardView;

mod login;
pub use login::{LoginView, RegisterView};

mod placeholder;
pub use placeholder::SectionPlaceholder;

mod settings;
pub use settings::SettingsView;
