//! Record builders for repository tests.

use chrono::Utc;
use domain::{
    Account, Address, Category, Condition, ObjectId, Order, OrderLine, OrderStatus,
    PaymentStatus, Product, ProductStatus,
};

pub fn seller(name: &str) -> Account {
    let now = Utc::now();
    Account {
        id: ObjectId::generate(),
        email: format!("{}@example.com", name.to_lowercase()),
        display_name: name.to_string(),
        profile_pic: None,
        bio: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn product(owner: &Account, title: &str, category: Category, price: f64) -> Product {
    let now = Utc::now();
    Product {
        id: ObjectId::generate(),
        product_title: title.to_string(),
        description: "Solid and well kept".to_string(),
        price,
        quantity: 1,
        year_of_manufacture: "2019".to_string(),
        model: "M-1".to_string(),
        brand: "Lumina".to_string(),
        weight: 1.5,
        dimensions: None,
        material: "Wood".to_string(),
        color: "Brown".to_string(),
        original_packaging: false,
        manual_included: true,
        working_condition_description: "Works".to_string(),
        condition: Condition::Used,
        status: ProductStatus::Available,
        category,
        image: "https://img.example.com/item.jpg".to_string(),
        seller: owner.id.clone(),
        seller_name: owner.display_name.clone(),
        created_at: now,
        updated_at: now,
    }
}

pub fn order(buyer: &Account, lines: usize) -> Order {
    let now = Utc::now();
    let items = (0..lines)
        .map(|i| OrderLine {
            product_id: ObjectId::generate(),
            product_title: Some(format!("Line {i}")),
            price: Some(10.0 * (i as f64 + 1.0)),
            quantity: 1,
            category: Some(Category::Furniture.as_str().to_string()),
            seller_id: Some(ObjectId::generate()),
            seller_name: Some("Sam".to_string()),
            image: None,
        })
        .collect();

    Order {
        id: ObjectId::generate(),
        buyer: buyer.id.clone(),
        buyer_name: buyer.display_name.clone(),
        items,
        total_amount: 60.0,
        address: Address {
            street: "1 Rd".to_string(),
            city: "X".to_string(),
            state: "Y".to_string(),
            postal_code: "12345".to_string(),
            country: Some("Nowhere".to_string()),
        },
        status: OrderStatus::Confirmed,
        payment_status: PaymentStatus::Completed,
        order_date: now,
        delivery_date: None,
        created_at: now,
        updated_at: now,
    }
}
