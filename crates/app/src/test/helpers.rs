//! Test Helpers

use jiff::civil::date;

use crate::{
    auth::{Actor, generate_api_token, hash_api_token},
    domain::{
        bakeries::{
            BakeriesService, BakeriesServiceError,
            data::NewBakery,
            records::{BakeryRecord, BakeryUuid},
        },
        orders::{
            data::{DeliveryDetails, NewOrder, NewOrderLine},
            records::OrderUuid,
            status::{EggType, PaymentMethod},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{
                ProductCategory, ProductEggType, ProductRecord, ProductUuid, WeightOption,
            },
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{Role, UserRecord, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_user(
    ctx: &TestContext,
    role: Role,
) -> Result<UserRecord, UsersServiceError> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            name: format!("{role} {uuid}"),
            email: format!("{uuid}@example.com"),
            phone: "9876543210".to_string(),
            role,
            token_hash: hash_api_token(&generate_api_token()),
        })
        .await
}

pub(crate) async fn create_actor(
    ctx: &TestContext,
    role: Role,
) -> Result<Actor, UsersServiceError> {
    let user = create_user(ctx, role).await?;

    Ok(Actor::new(user.uuid, user.role))
}

pub(crate) async fn create_bakery(
    ctx: &TestContext,
    owner: UserUuid,
) -> Result<BakeryRecord, BakeriesServiceError> {
    ctx.bakeries
        .create_bakery(NewBakery {
            uuid: BakeryUuid::new(),
            owner_uuid: owner,
            bakery_name: "Sugar Loaf".to_string(),
            city: "Indore".to_string(),
            address: "4 Mill Road".to_string(),
            description: Some("Cakes to order".to_string()),
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    bakery: BakeryUuid,
    name: &str,
    options: &[(&str, u64)],
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            bakery_uuid: bakery,
            name: name.to_string(),
            description: format!("{name}, freshly baked"),
            category: ProductCategory::Cake,
            egg_type: ProductEggType::Both,
            weight_options: options
                .iter()
                .map(|(weight, price)| WeightOption {
                    weight: (*weight).to_string(),
                    price: *price,
                })
                .collect(),
            is_available: true,
            custom_message_available: true,
        })
        .await
}

pub(crate) fn line(product: ProductUuid, weight: &str, quantity: u32) -> NewOrderLine {
    NewOrderLine {
        product_uuid: product,
        quantity,
        weight: weight.to_string(),
        egg_type: EggType::Eggless,
        custom_message: None,
    }
}

pub(crate) fn new_order(bakery: BakeryUuid, items: Vec<NewOrderLine>) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        bakery_uuid: bakery,
        items,
        delivery: DeliveryDetails {
            delivery_date: date(2026, 12, 24),
            delivery_time: "18:00".to_string(),
            delivery_address: "22 Lake View, Indore".to_string(),
            customer_phone: "9123456780".to_string(),
            special_instructions: None,
        },
        payment_method: PaymentMethod::Cod,
    }
}

/// One of each role, a bakery and a cake selling at 20 per kilo.
pub(crate) struct Marketplace {
    pub customer: Actor,
    pub baker: Actor,
    pub courier: Actor,
    pub admin: Actor,
    pub bakery: BakeryRecord,
    pub cake: ProductRecord,
}

impl Marketplace {
    pub(crate) async fn seed(ctx: &TestContext) -> testresult::TestResult<Self> {
        let customer = create_actor(ctx, Role::Customer).await?;
        let baker = create_actor(ctx, Role::Baker).await?;
        let courier = create_actor(ctx, Role::Delivery).await?;
        let admin = create_actor(ctx, Role::Admin).await?;
        let bakery = create_bakery(ctx, baker.user_uuid).await?;
        let cake = create_product(ctx, bakery.uuid, "Chocolate Cake", &[("500g", 12), ("1kg", 20)])
            .await?;

        Ok(Self {
            customer,
            baker,
            courier,
            admin,
            bakery,
            cake,
        })
    }

    /// A new order for two kilo-cakes.
    pub(crate) fn cake_order(&self) -> NewOrder {
        new_order(self.bakery.uuid, vec![line(self.cake.uuid, "1kg", 2)])
    }
}
