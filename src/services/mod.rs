// minibrowser services
// Cross-cutting engines that are not tab-keyed collections.

pub mod settings_engine;
