pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{TEST_CITY, TEST_PASSWORD, TEST_PHONE_NUMBER, TEST_REGION},
        fixtures::marketplace::ContractChain,
        test_setup_with_marketplace_tables, test_setup_with_tables, TestBuilder, TestContext,
        TestError,
    };
}
