use bakehouse_app::{
    auth::{generate_api_token, hash_api_token},
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{Role, UserUuid},
    },
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Unique email address
    #[arg(long)]
    email: String,

    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// One of customer, baker, delivery or admin
    #[arg(long)]
    role: Role,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<UserUuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.email.trim().is_empty() {
        return Err("email cannot be empty".to_string());
    }

    let db = crate::cli::connect(&args.database_url).await?;
    let service = PgUsersService::new(db);
    let token = generate_api_token();

    let user = service
        .create_user(NewUser {
            uuid: args.user_uuid.unwrap_or_default(),
            name: args.name.trim().to_string(),
            email: args.email.trim().to_lowercase(),
            phone: args.phone.trim().to_string(),
            role: args.role,
            token_hash: hash_api_token(&token),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("role: {}", user.role);
    println!("api_token: {token}");
    println!("store this token now; it is only shown once");

    Ok(())
}
