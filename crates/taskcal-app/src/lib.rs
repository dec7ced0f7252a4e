// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backend;
pub mod error;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod model;
pub mod render;
pub mod state;
pub mod store;
pub mod sync;

pub use backend::*;
pub use error::*;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use render::*;
pub use state::*;
pub use store::*;
pub use sync::*;
