use cucumber::given;

use crate::cucumber::{notifier_world::NotifierSystem, NotifierWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut NotifierWorld) {
    let system = NotifierSystem::new().await;
    world.system = Some(system);
}
