use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique telegram_id
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "telegram_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // items: keyed by name, so the name must be unique
    {
        let col = db.collection::<mongodb::bson::Document>("items");
        let model = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // watchlist: a user watches an item at most once
    {
        let col = db.collection::<mongodb::bson::Document>("watchlist");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "item_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // watchlist: per-user listing scan
    {
        let col = db.collection::<mongodb::bson::Document>("watchlist");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": 1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
