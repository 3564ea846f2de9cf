use sea_orm::{sea_query::TableCreateStatement, DbBackend, Schema};

/// CREATE TABLE statements for every marketplace entity in foreign key order.
pub fn marketplace_tables() -> Vec<TableCreateStatement> {
    let schema = Schema::new(DbBackend::Sqlite);

    vec![
        schema.create_table_from_entity(entity::prelude::WaslUser),
        schema.create_table_from_entity(entity::prelude::Admin),
        schema.create_table_from_entity(entity::prelude::Company),
        schema.create_table_from_entity(entity::prelude::Provider),
        schema.create_table_from_entity(entity::prelude::ShipmentRequest),
        schema.create_table_from_entity(entity::prelude::Bid),
        schema.create_table_from_entity(entity::prelude::Contract),
        schema.create_table_from_entity(entity::prelude::Invoice),
        schema.create_table_from_entity(entity::prelude::Payment),
        schema.create_table_from_entity(entity::prelude::Shipment),
        schema.create_table_from_entity(entity::prelude::Feedback),
        schema.create_table_from_entity(entity::prelude::RevenueReport),
    ]
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        $crate::TestContext::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = $crate::TestContext::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

#[macro_export]
macro_rules! test_setup_with_marketplace_tables {
    () => {{
        async {
            let setup = $crate::TestContext::new().await?;
            setup.with_tables($crate::setup::marketplace_tables()).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}
