//! Cats document store: the `CatStore` port, its MongoDB adapter, seeding,
//! and the interactive menu.

pub mod menu;
pub mod model;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod seed;
pub mod store;

pub use menu::{Console, IoConsole, MenuChoice, run_menu};
pub use model::{Cat, sample_cats};
#[cfg(feature = "mongo")]
pub use mongo::MongoCatStore;
pub use seed::seed_sample_data;
pub use store::CatStore;
