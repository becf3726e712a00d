mod notifier_world;
mod setups;
mod steps;

pub use notifier_world::NotifierWorld;
