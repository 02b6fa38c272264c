use crate::database::{order_items, orders, run_blocking, storage_failure, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use domain::{
    Address, DomainError, ObjectId, Order, OrderLine, OrderRepository, OrderStatus,
};
use std::collections::HashMap;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderRow {
    id: String,
    buyer: String,
    buyer_name: String,
    total_amount: f64,
    street: String,
    city: String,
    state: String,
    postal_code: String,
    country: Option<String>,
    status: String,
    payment_status: String,
    order_date: NaiveDateTime,
    delivery_date: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
struct NewOrderRow {
    id: String,
    buyer: String,
    buyer_name: String,
    total_amount: f64,
    street: String,
    city: String,
    state: String,
    postal_code: String,
    country: Option<String>,
    status: String,
    payment_status: String,
    order_date: NaiveDateTime,
    delivery_date: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct OrderItemRow {
    order_id: String,
    position: i32,
    product_id: String,
    product_title: Option<String>,
    price: Option<f64>,
    quantity: i64,
    category: Option<String>,
    seller_id: Option<String>,
    seller_name: Option<String>,
    image: Option<String>,
}

fn corrupt(id: &str, err: impl std::fmt::Display) -> DomainError {
    storage_failure("decode order", format!("row {id}: {err}"))
}

fn decode_line(row: OrderItemRow) -> Result<OrderLine, DomainError> {
    let product_id = ObjectId::parse(&row.product_id)
        .ok_or_else(|| corrupt(&row.order_id, "bad product reference"))?;
    let seller_id = match row.seller_id.as_deref() {
        Some(raw) => Some(ObjectId::parse(raw).ok_or_else(|| corrupt(&row.order_id, "bad seller"))?),
        None => None,
    };
    Ok(OrderLine {
        product_id,
        product_title: row.product_title,
        price: row.price,
        quantity: row.quantity,
        category: row.category,
        seller_id,
        seller_name: row.seller_name,
        image: row.image,
    })
}

fn decode_order(row: OrderRow, lines: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    let id = ObjectId::parse(&row.id).ok_or_else(|| corrupt(&row.id, "bad id"))?;
    let buyer = ObjectId::parse(&row.buyer).ok_or_else(|| corrupt(&row.id, "bad buyer"))?;
    let status = row.status.parse().map_err(|e| corrupt(&row.id, e))?;
    let payment_status = row.payment_status.parse().map_err(|e| corrupt(&row.id, e))?;
    let items = lines.into_iter().map(decode_line).collect::<Result<Vec<_>, _>>()?;

    Ok(Order {
        id,
        buyer,
        buyer_name: row.buyer_name,
        items,
        total_amount: row.total_amount,
        address: Address {
            street: row.street,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
        },
        status,
        payment_status,
        order_date: row.order_date.and_utc(),
        delivery_date: row.delivery_date.map(|d| d.and_utc()),
        created_at: row.created_at.and_utc(),
        updated_at: row.updated_at.and_utc(),
    })
}

fn encode(order: &Order) -> (NewOrderRow, Vec<OrderItemRow>) {
    let id = order.id.to_string();
    let lines = order
        .items
        .iter()
        .enumerate()
        .map(|(position, line)| OrderItemRow {
            order_id: id.clone(),
            position: i32::try_from(position).unwrap_or(i32::MAX),
            product_id: line.product_id.to_string(),
            product_title: line.product_title.clone(),
            price: line.price,
            quantity: line.quantity,
            category: line.category.clone(),
            seller_id: line.seller_id.as_ref().map(ToString::to_string),
            seller_name: line.seller_name.clone(),
            image: line.image.clone(),
        })
        .collect();

    let row = NewOrderRow {
        id,
        buyer: order.buyer.to_string(),
        buyer_name: order.buyer_name.clone(),
        total_amount: order.total_amount,
        street: order.address.street.clone(),
        city: order.address.city.clone(),
        state: order.address.state.clone(),
        postal_code: order.address.postal_code.clone(),
        country: order.address.country.clone(),
        status: order.status.as_str().to_string(),
        payment_status: order.payment_status.as_str().to_string(),
        order_date: order.order_date.naive_utc(),
        delivery_date: order.delivery_date.map(|d| d.naive_utc()),
        created_at: order.created_at.naive_utc(),
        updated_at: order.updated_at.naive_utc(),
    };

    (row, lines)
}

/// Loads the given orders together with their lines, keeping the order of `rows`.
fn with_lines(
    conn: &mut SqliteConnection,
    rows: Vec<OrderRow>,
) -> QueryResult<Vec<(OrderRow, Vec<OrderItemRow>)>> {
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    let items = order_items::table
        .filter(order_items::order_id.eq_any(ids))
        .order((order_items::order_id.asc(), order_items::position.asc()))
        .select(OrderItemRow::as_select())
        .load::<OrderItemRow>(conn)?;

    let mut by_order: HashMap<String, Vec<OrderItemRow>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let lines = by_order.remove(&row.id).unwrap_or_default();
            (row, lines)
        })
        .collect())
}

fn decode_all(loaded: Vec<(OrderRow, Vec<OrderItemRow>)>) -> Result<Vec<Order>, DomainError> {
    loaded
        .into_iter()
        .map(|(row, lines)| decode_order(row, lines))
        .collect()
}

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn insert(&self, order: &Order) -> Result<Order, DomainError> {
        let (row, lines) = encode(order);
        let id = row.id.clone();

        let loaded = run_blocking(&self.pool, "insert order", move |conn| {
            conn.transaction(|conn| {
                diesel::insert_into(orders::table).values(&row).execute(conn)?;
                diesel::insert_into(order_items::table)
                    .values(&lines)
                    .execute(conn)?;

                let saved = orders::table
                    .filter(orders::id.eq(&id))
                    .select(OrderRow::as_select())
                    .load::<OrderRow>(conn)?;
                with_lines(conn, saved)
            })
        })
        .await?;

        decode_all(loaded)?
            .into_iter()
            .next()
            .ok_or_else(|| storage_failure("insert order", "order vanished after insert"))
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Order>, DomainError> {
        let id = id.to_string();
        let loaded = run_blocking(&self.pool, "find order", move |conn| {
            let rows = orders::table
                .filter(orders::id.eq(id))
                .select(OrderRow::as_select())
                .load::<OrderRow>(conn)?;
            with_lines(conn, rows)
        })
        .await?;

        Ok(decode_all(loaded)?.into_iter().next())
    }

    async fn find_by_buyer(&self, buyer: &ObjectId) -> Result<Vec<Order>, DomainError> {
        let buyer = buyer.to_string();
        let loaded = run_blocking(&self.pool, "find orders by buyer", move |conn| {
            let rows = orders::table
                .filter(orders::buyer.eq(buyer))
                .order((orders::order_date.desc(), orders::seq.desc()))
                .select(OrderRow::as_select())
                .load::<OrderRow>(conn)?;
            with_lines(conn, rows)
        })
        .await?;

        decode_all(loaded)
    }

    async fn transition_status(
        &self,
        id: &ObjectId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let id = id.to_string();
        let from: Vec<&'static str> = from.iter().map(OrderStatus::as_str).collect();
        let now = Utc::now().naive_utc();

        let changed = run_blocking(&self.pool, "update order status", move |conn| {
            diesel::update(
                orders::table
                    .filter(orders::id.eq(id))
                    .filter(orders::status.eq_any(from)),
            )
            .set((orders::status.eq(to.as_str()), orders::updated_at.eq(now)))
            .execute(conn)
        })
        .await?;

        Ok(changed > 0)
    }
}
