use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Set,
};

pub mod fruit {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "fruits")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub status: String,
        pub points: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(fruit::Entity)))
        .await?;

    Ok(db)
}

pub async fn seed_fruits(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (name, status, points) in [
        ("apple", "open", 10),
        ("banana", "open", 5),
        ("cherry", "closed", 20),
        ("durian", "archived", 1),
    ] {
        fruit::ActiveModel {
            name: Set(name.to_string()),
            status: Set(status.to_string()),
            points: Set(points),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
