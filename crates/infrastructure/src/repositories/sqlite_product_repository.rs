use crate::database::{contains_pattern, products, run_blocking, storage_failure, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use domain::{
    Dimensions, DomainError, ObjectId, PageRequest, Product, ProductChanges, ProductFilter,
    ProductRepository, ProductStatus,
};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ProductRow {
    id: String,
    product_title: String,
    description: String,
    price: f64,
    quantity: i64,
    year_of_manufacture: String,
    model: String,
    brand: String,
    weight: f64,
    dim_length: Option<f64>,
    dim_width: Option<f64>,
    dim_height: Option<f64>,
    material: String,
    color: String,
    original_packaging: bool,
    manual_included: bool,
    working_condition_description: String,
    condition: String,
    status: String,
    category: String,
    image: String,
    seller: String,
    seller_name: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = products)]
struct ProductValues {
    id: String,
    product_title: String,
    description: String,
    price: f64,
    quantity: i64,
    year_of_manufacture: String,
    model: String,
    brand: String,
    weight: f64,
    dim_length: Option<f64>,
    dim_width: Option<f64>,
    dim_height: Option<f64>,
    material: String,
    color: String,
    original_packaging: bool,
    manual_included: bool,
    working_condition_description: String,
    condition: String,
    status: String,
    category: String,
    image: String,
    seller: String,
    seller_name: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Partial update: `None` leaves a column alone. Submitted dimensions
/// replace all three columns, clearing the ones left out.
#[derive(AsChangeset)]
#[diesel(table_name = products)]
struct ProductEdits {
    product_title: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
    year_of_manufacture: Option<String>,
    model: Option<String>,
    brand: Option<String>,
    weight: Option<f64>,
    dim_length: Option<Option<f64>>,
    dim_width: Option<Option<f64>>,
    dim_height: Option<Option<f64>>,
    material: Option<String>,
    color: Option<String>,
    original_packaging: Option<bool>,
    manual_included: Option<bool>,
    working_condition_description: Option<String>,
    condition: Option<String>,
    status: Option<String>,
    category: Option<String>,
    image: Option<String>,
    updated_at: NaiveDateTime,
}

impl From<&ProductChanges> for ProductEdits {
    fn from(changes: &ProductChanges) -> Self {
        let dimensions = changes.dimensions;
        ProductEdits {
            product_title: changes.product_title.clone(),
            description: changes.description.clone(),
            price: changes.price,
            quantity: changes.quantity,
            year_of_manufacture: changes.year_of_manufacture.clone(),
            model: changes.model.clone(),
            brand: changes.brand.clone(),
            weight: changes.weight,
            dim_length: dimensions.map(|d| d.length),
            dim_width: dimensions.map(|d| d.width),
            dim_height: dimensions.map(|d| d.height),
            material: changes.material.clone(),
            color: changes.color.clone(),
            original_packaging: changes.original_packaging,
            manual_included: changes.manual_included,
            working_condition_description: changes.working_condition_description.clone(),
            condition: changes.condition.map(|c| c.as_str().to_string()),
            status: changes.status.map(|s| s.as_str().to_string()),
            category: changes.category.map(|c| c.as_str().to_string()),
            image: changes.image.clone(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

fn corrupt(id: &str, err: impl std::fmt::Display) -> DomainError {
    storage_failure("decode product", format!("row {id}: {err}"))
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = ObjectId::parse(&row.id).ok_or_else(|| corrupt(&row.id, "bad id"))?;
        let seller = ObjectId::parse(&row.seller).ok_or_else(|| corrupt(&row.id, "bad seller"))?;
        let condition = row.condition.parse().map_err(|e| corrupt(&row.id, e))?;
        let status = row.status.parse().map_err(|e| corrupt(&row.id, e))?;
        let category = row.category.parse().map_err(|e| corrupt(&row.id, e))?;

        let dimensions = match (row.dim_length, row.dim_width, row.dim_height) {
            (None, None, None) => None,
            (length, width, height) => Some(Dimensions { length, width, height }),
        };

        Ok(Product {
            id,
            product_title: row.product_title,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
            year_of_manufacture: row.year_of_manufacture,
            model: row.model,
            brand: row.brand,
            weight: row.weight,
            dimensions,
            material: row.material,
            color: row.color,
            original_packaging: row.original_packaging,
            manual_included: row.manual_included,
            working_condition_description: row.working_condition_description,
            condition,
            status,
            category,
            image: row.image,
            seller,
            seller_name: row.seller_name,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        })
    }
}

impl From<&Product> for ProductValues {
    fn from(product: &Product) -> Self {
        let dimensions = product.dimensions.unwrap_or_default();
        ProductValues {
            id: product.id.to_string(),
            product_title: product.product_title.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            year_of_manufacture: product.year_of_manufacture.clone(),
            model: product.model.clone(),
            brand: product.brand.clone(),
            weight: product.weight,
            dim_length: dimensions.length,
            dim_width: dimensions.width,
            dim_height: dimensions.height,
            material: product.material.clone(),
            color: product.color.clone(),
            original_packaging: product.original_packaging,
            manual_included: product.manual_included,
            working_condition_description: product.working_condition_description.clone(),
            condition: product.condition.as_str().to_string(),
            status: product.status.as_str().to_string(),
            category: product.category.as_str().to_string(),
            image: product.image.clone(),
            seller: product.seller.to_string(),
            seller_name: product.seller_name.clone(),
            created_at: product.created_at.naive_utc(),
            updated_at: product.updated_at.naive_utc(),
        }
    }
}

fn decode_all(rows: Vec<ProductRow>) -> Result<Vec<Product>, DomainError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Applies every set field of `filter` as an AND-ed condition.
fn filtered(filter: &ProductFilter) -> products::BoxedQuery<'static, Sqlite> {
    let mut query = products::table.into_boxed();

    if let Some(category) = filter.category {
        query = query.filter(products::category.eq(category.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(products::status.eq(status.as_str()));
    }
    if let Some(condition) = filter.condition {
        query = query.filter(products::condition.eq(condition.as_str()));
    }
    if let Some(brand) = &filter.brand {
        query = query.filter(products::brand.like(contains_pattern(brand)).escape('\\'));
    }
    if let Some(color) = &filter.color {
        query = query.filter(products::color.like(contains_pattern(color)).escape('\\'));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(products::price.ge(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(products::price.le(max));
    }
    if let Some(seller) = &filter.seller {
        query = query.filter(products::seller.eq(seller.to_string()));
    }
    if let Some(text) = &filter.text {
        let pattern = contains_pattern(text);
        query = query.filter(
            products::product_title
                .like(pattern.clone())
                .escape('\\')
                .or(products::description.like(pattern.clone()).escape('\\'))
                .or(products::brand.like(pattern.clone()).escape('\\'))
                .or(products::model.like(pattern).escape('\\')),
        );
    }

    query
}

fn load_one(conn: &mut SqliteConnection, id: &str) -> QueryResult<Option<ProductRow>> {
    products::table
        .filter(products::id.eq(id))
        .select(ProductRow::as_select())
        .first::<ProductRow>(conn)
        .optional()
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn insert(&self, product: &Product) -> Result<Product, DomainError> {
        let values = ProductValues::from(product);
        let id = values.id.clone();

        let row = run_blocking(&self.pool, "insert product", move |conn| {
            diesel::insert_into(products::table)
                .values(&values)
                .execute(conn)?;
            products::table
                .filter(products::id.eq(id))
                .select(ProductRow::as_select())
                .first::<ProductRow>(conn)
        })
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError> {
        let id = id.to_string();
        let row = run_blocking(&self.pool, "find product", move |conn| load_one(conn, &id)).await?;
        row.map(Product::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();

        let rows = run_blocking(&self.pool, "find products", move |conn| {
            products::table
                .filter(products::id.eq_any(ids))
                .order((products::created_at.desc(), products::seq.desc()))
                .select(ProductRow::as_select())
                .load::<ProductRow>(conn)
        })
        .await?;

        decode_all(rows)
    }

    async fn find_matching(
        &self,
        filter: &ProductFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Product>, DomainError> {
        let filter = filter.clone();

        let rows = run_blocking(&self.pool, "query products", move |conn| {
            let mut query = filtered(&filter)
                .order((products::created_at.desc(), products::seq.desc()))
                .select(ProductRow::as_select());
            if let Some(page) = page {
                let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
                let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
                query = query.offset(offset).limit(limit);
            }
            query.load::<ProductRow>(conn)
        })
        .await?;

        decode_all(rows)
    }

    async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, DomainError> {
        let filter = filter.clone();

        let count = run_blocking(&self.pool, "count products", move |conn| {
            filtered(&filter).count().get_result::<i64>(conn)
        })
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn update(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, DomainError> {
        let id = id.to_string();
        let seller = seller.to_string();
        let edits = ProductEdits::from(changes);

        let row = run_blocking(&self.pool, "update product", move |conn| {
            conn.transaction(|conn| {
                let changed = diesel::update(
                    products::table
                        .filter(products::id.eq(&id))
                        .filter(products::seller.eq(&seller)),
                )
                .set(&edits)
                .execute(conn)?;
                if changed == 0 {
                    return Ok(None);
                }
                load_one(conn, &id)
            })
        })
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn set_status(
        &self,
        id: &ObjectId,
        seller: &ObjectId,
        status: ProductStatus,
    ) -> Result<Option<Product>, DomainError> {
        let id = id.to_string();
        let seller = seller.to_string();
        let now = Utc::now().naive_utc();

        let row = run_blocking(&self.pool, "update product status", move |conn| {
            conn.transaction(|conn| {
                let changed = diesel::update(
                    products::table
                        .filter(products::id.eq(&id))
                        .filter(products::seller.eq(&seller)),
                )
                .set((
                    products::status.eq(status.as_str()),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;
                if changed == 0 {
                    return Ok(None);
                }
                load_one(conn, &id)
            })
        })
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn delete(&self, id: &ObjectId, seller: &ObjectId) -> Result<bool, DomainError> {
        let id = id.to_string();
        let seller = seller.to_string();

        let removed = run_blocking(&self.pool, "delete product", move |conn| {
            diesel::delete(
                products::table
                    .filter(products::id.eq(id))
                    .filter(products::seller.eq(seller)),
            )
            .execute(conn)
        })
        .await?;

        Ok(removed > 0)
    }
}
