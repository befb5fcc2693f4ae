use crate::package::PackageService;

pub struct AppState {
    pub service: PackageService,
}
