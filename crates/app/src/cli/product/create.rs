use bakehouse_app::domain::{
    bakeries::records::BakeryUuid,
    products::{
        PgProductsService, ProductsService,
        data::NewProduct,
        records::{ProductCategory, ProductEggType, ProductUuid, WeightOption},
    },
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// UUID of the bakery selling the product
    #[arg(long)]
    bakery: BakeryUuid,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// One of cake, pastry, cookie or custom
    #[arg(long, default_value = "cake")]
    category: ProductCategory,

    /// One of egg, eggless or both
    #[arg(long, default_value = "both")]
    egg_type: ProductEggType,

    /// Weight tier and price, e.g. `1kg=2000`; repeat for more tiers
    #[arg(long = "weight-option", required = true)]
    weight_options: Vec<WeightOption>,

    /// List the product as not available for ordering
    #[arg(long)]
    unavailable: bool,

    /// Accept a custom message on the product
    #[arg(long)]
    custom_message: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgProductsService::new(db);

    let product = service
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            bakery_uuid: args.bakery,
            name: args.name,
            description: args.description,
            category: args.category,
            egg_type: args.egg_type,
            weight_options: args.weight_options.into_iter().collect(),
            is_available: !args.unavailable,
            custom_message_available: args.custom_message,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);

    for option in &product.weight_options {
        println!("weight_option: {} = {}", option.weight, option.price);
    }

    Ok(())
}
