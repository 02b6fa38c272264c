// Marketplace tables. `seq` is the insertion order, `id` the public identifier.
diesel::table! {
    accounts (seq) {
        seq -> Integer,
        id -> Text,
        email -> Text,
        display_name -> Text,
        password_hash -> Text,
        profile_pic -> Nullable<Text>,
        bio -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    products (seq) {
        seq -> Integer,
        id -> Text,
        product_title -> Text,
        description -> Text,
        price -> Double,
        quantity -> BigInt,
        year_of_manufacture -> Text,
        model -> Text,
        brand -> Text,
        weight -> Double,
        dim_length -> Nullable<Double>,
        dim_width -> Nullable<Double>,
        dim_height -> Nullable<Double>,
        material -> Text,
        color -> Text,
        original_packaging -> Bool,
        manual_included -> Bool,
        working_condition_description -> Text,
        condition -> Text,         // New, Used, Refurbished
        status -> Text,            // Available, Sold
        category -> Text,
        image -> Text,
        seller -> Text,
        seller_name -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    orders (seq) {
        seq -> Integer,
        id -> Text,
        buyer -> Text,
        buyer_name -> Text,
        total_amount -> Double,
        street -> Text,
        city -> Text,
        state -> Text,
        postal_code -> Text,
        country -> Nullable<Text>,
        status -> Text,            // Pending, Confirmed, Shipped, Delivered, Cancelled
        payment_status -> Text,
        order_date -> Timestamp,
        delivery_date -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    order_items (seq) {
        seq -> Integer,
        order_id -> Text,
        position -> Integer,       // Line index within the order
        product_id -> Text,
        product_title -> Nullable<Text>,
        price -> Nullable<Double>,
        quantity -> BigInt,
        category -> Nullable<Text>,
        seller_id -> Nullable<Text>,
        seller_name -> Nullable<Text>,
        image -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(accounts, products, orders, order_items,);
