use batchlens_api::StoreSnapshot;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schemars::schema_for!(StoreSnapshot);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
