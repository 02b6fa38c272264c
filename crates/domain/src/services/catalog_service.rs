use crate::entities::{
    Account, Category, ObjectId, Product, ProductFilter, ProductListQuery, ProductPage,
    ProductStatus, ProductUpdate,
};
use crate::errors::DomainError;
use crate::repositories::ProductRepository;
use crate::services::listing_validator::ProductSubmission;
use std::sync::Arc;
use tracing::info;

/// Product catalog - listing lifecycle and the public read side.
pub struct CatalogService {
    product_repository: Arc<dyn ProductRepository>,
}

fn product_id(raw: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse(raw)
        .ok_or_else(|| DomainError::InvalidIdentifier("Invalid product ID format".to_string()))
}

fn product_not_found() -> DomainError {
    DomainError::not_found("Product not found")
}

impl CatalogService {
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// Lists a new product for `seller`. Seller id and name are always taken
    /// from the account, never from the submission.
    pub async fn create_listing(
        &self,
        seller: &Account,
        submission: ProductSubmission,
    ) -> Result<Product, DomainError> {
        let listing = submission.into_listing()?;
        let product = Product::list(listing, seller);
        let saved = self.product_repository.insert(&product).await?;

        info!(product_id = %saved.id, seller = %seller.id, "listed product");
        Ok(saved)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        let id = product_id(id)?;
        self.product_repository
            .find_by_id(&id)
            .await?
            .ok_or_else(product_not_found)
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list_products(&self, query: ProductListQuery) -> Result<ProductPage, DomainError> {
        let (filter, page) = query.into_parts()?;

        let items = self.product_repository.find_matching(&filter, Some(page)).await?;
        let total = self.product_repository.count_matching(&filter).await?;

        Ok(ProductPage {
            items,
            total,
            page: page.page,
            pages: page.page_count(total),
        })
    }

    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Product>, DomainError> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| DomainError::validation("Search query is required"))?;

        self.product_repository
            .find_matching(&ProductFilter::text(query), None)
            .await
    }

    pub async fn list_by_category(&self, segment: &str) -> Result<Vec<Product>, DomainError> {
        let category = Category::from_path_segment(segment)?;
        self.product_repository
            .find_matching(&ProductFilter::category(category), None)
            .await
    }

    pub async fn list_by_seller(&self, seller: &Account) -> Result<Vec<Product>, DomainError> {
        self.product_repository
            .find_matching(&ProductFilter::seller(seller.id.clone()), None)
            .await
    }

    /// Loads a product the caller is allowed to modify.
    async fn owned_product(&self, id: &str, caller: &Account) -> Result<Product, DomainError> {
        let product = self.get_product(id).await?;
        if !product.is_owned_by(caller) {
            return Err(DomainError::forbidden(
                "Unauthorized: You can only modify your own products",
            ));
        }
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: &str,
        caller: &Account,
        update: ProductUpdate,
    ) -> Result<Product, DomainError> {
        let changes = update.into_changes()?;
        let product = self.owned_product(id, caller).await?;

        let updated = self
            .product_repository
            .update(&product.id, &caller.id, &changes)
            .await?
            .ok_or_else(product_not_found)?;

        info!(product_id = %updated.id, "updated product");
        Ok(updated)
    }

    pub async fn update_status(
        &self,
        id: &str,
        caller: &Account,
        status: Option<&str>,
    ) -> Result<Product, DomainError> {
        let status = status
            .and_then(|s| s.parse::<ProductStatus>().ok())
            .ok_or_else(|| {
                DomainError::validation("Status must be either 'Available' or 'Sold'")
            })?;
        let product = self.owned_product(id, caller).await?;

        let updated = self
            .product_repository
            .set_status(&product.id, &caller.id, status)
            .await?
            .ok_or_else(product_not_found)?;

        info!(product_id = %updated.id, status = %status, "product status changed");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str, caller: &Account) -> Result<(), DomainError> {
        let product = self.owned_product(id, caller).await?;

        if !self.product_repository.delete(&product.id, &caller.id).await? {
            return Err(product_not_found());
        }

        info!(product_id = %product.id, "deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::listing_validator::tests::complete_submission;
    use crate::testing::{account, InMemoryProducts};
    use rstest::rstest;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(InMemoryProducts::default()))
    }

    fn submission(title: &str, category: &str, price: f64) -> ProductSubmission {
        ProductSubmission {
            product_title: Some(title.to_string()),
            category: Some(category.to_string()),
            price: Some(price),
            ..complete_submission()
        }
    }

    #[tokio::test]
    async fn create_takes_seller_from_account_and_starts_available() {
        let catalog = service();
        let seller = account("Sam");

        let product = catalog
            .create_listing(&seller, submission("Radio", "Electronics", 500.0))
            .await
            .expect("created");

        assert_eq!(product.seller, seller.id);
        assert_eq!(product.seller_name, "Sam");
        assert_eq!(product.status, ProductStatus::Available);
        assert_eq!(catalog.get_product(product.id.as_str()).await, Ok(product));
    }

    #[tokio::test]
    async fn create_surfaces_every_validation_error() {
        let catalog = service();
        let bad = ProductSubmission {
            image: None,
            category: Some("Toys".to_string()),
            ..complete_submission()
        };

        let err = catalog.create_listing(&account("Sam"), bad).await.expect_err("invalid");

        let DomainError::InvalidListing(errors) = err else {
            panic!("expected the multi-error variant");
        };
        assert_eq!(errors.len(), 2);
    }

    #[rstest]
    #[case("not-an-id", DomainError::InvalidIdentifier("Invalid product ID format".into()))]
    #[case("64b7f0c2a1e4d3b2c1a09f8e", DomainError::NotFound("Product not found".into()))]
    #[tokio::test]
    async fn get_rejects_bad_and_unknown_ids(#[case] id: &str, #[case] expected: DomainError) {
        assert_eq!(service().get_product(id).await, Err(expected));
    }

    #[tokio::test]
    async fn second_page_of_twelve() {
        let catalog = service();
        let seller = account("Sam");
        for n in 0..12 {
            catalog
                .create_listing(&seller, submission(&format!("Item {n}"), "Furniture", 10.0))
                .await
                .expect("created");
        }

        let query = ProductListQuery {
            page: Some("2".into()),
            limit: Some("5".into()),
            ..ProductListQuery::default()
        };
        let page = catalog.list_products(query).await.expect("listed");

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 12);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].product_title, "Item 6");
    }

    #[tokio::test]
    async fn list_filters_by_category_and_price() {
        let catalog = service();
        let seller = account("Sam");
        for (title, category, price) in [
            ("Sofa", "Furniture", 300.0),
            ("Phone", "Electronics", 200.0),
            ("Laptop", "Electronics", 900.0),
        ] {
            catalog.create_listing(&seller, submission(title, category, price)).await.expect("created");
        }

        let query = ProductListQuery {
            category: Some("Electronics".into()),
            max_price: Some("500".into()),
            ..ProductListQuery::default()
        };
        let page = catalog.list_products(query).await.expect("listed");

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].product_title, "Phone");
    }

    #[tokio::test]
    async fn list_rejects_unknown_category() {
        let query = ProductListQuery { category: Some("Toys".into()), ..ProductListQuery::default() };
        assert!(matches!(
            service().list_products(query).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[tokio::test]
    async fn search_requires_a_query(#[case] query: Option<&str>) {
        assert_eq!(
            service().search(query).await,
            Err(DomainError::validation("Search query is required"))
        );
    }

    #[tokio::test]
    async fn search_matches_any_text_field_ignoring_case() {
        let catalog = service();
        let seller = account("Sam");
        catalog.create_listing(&seller, submission("Oak table", "Furniture", 10.0)).await.expect("created");
        catalog.create_listing(&seller, submission("Kettle", "Kitchen Appliances", 10.0)).await.expect("created");

        let found = catalog.search(Some("OAK")).await.expect("searched");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].product_title, "Oak table");

        let by_brand = catalog.search(Some("lumina")).await.expect("searched");
        assert_eq!(by_brand.len(), 2);
    }

    #[tokio::test]
    async fn category_listing_normalises_path_tokens() {
        let catalog = service();
        let seller = account("Sam");
        catalog.create_listing(&seller, submission("Kettle", "Kitchen Appliances", 10.0)).await.expect("created");

        let found = catalog.list_by_category("kitchen_appliances").await.expect("listed");
        assert_eq!(found.len(), 1);
        assert!(matches!(
            catalog.list_by_category("toys").await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn sellers_only_see_their_own_listings() {
        let catalog = service();
        let sam = account("Sam");
        let kim = account("Kim");
        catalog.create_listing(&sam, submission("Chair", "Furniture", 10.0)).await.expect("created");
        catalog.create_listing(&kim, submission("Shirt", "Clothes", 10.0)).await.expect("created");

        let mine = catalog.list_by_seller(&sam).await.expect("listed");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].seller, sam.id);
    }

    #[tokio::test]
    async fn only_the_owner_may_mutate() {
        let catalog = service();
        let sam = account("Sam");
        let kim = account("Kim");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");
        let id = product.id.as_str();

        let forbidden = DomainError::forbidden("Unauthorized: You can only modify your own products");
        assert_eq!(
            catalog.update_product(id, &kim, ProductUpdate::default()).await,
            Err(forbidden.clone())
        );
        assert_eq!(catalog.update_status(id, &kim, Some("Sold")).await, Err(forbidden.clone()));
        assert_eq!(catalog.delete_product(id, &kim).await, Err(forbidden));

        assert_eq!(catalog.get_product(id).await, Ok(product));
    }

    #[tokio::test]
    async fn owner_can_update_fields() {
        let catalog = service();
        let sam = account("Sam");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");

        let update = ProductUpdate {
            price: Some(12.5),
            color: Some("Red".into()),
            ..ProductUpdate::default()
        };
        let updated = catalog
            .update_product(product.id.as_str(), &sam, update)
            .await
            .expect("updated");

        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.color, "Red");
        assert_eq!(updated.product_title, "Chair");
    }

    #[tokio::test]
    async fn field_edit_keeps_a_status_set_in_between() {
        let catalog = service();
        let sam = account("Sam");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");
        let id = product.id.as_str();

        catalog.update_status(id, &sam, Some("Sold")).await.expect("sold");
        let update = ProductUpdate { price: Some(9.0), ..ProductUpdate::default() };
        let updated = catalog.update_product(id, &sam, update).await.expect("updated");

        assert_eq!(updated.price, 9.0);
        assert_eq!(updated.status, ProductStatus::Sold);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Reserved"))]
    #[case(Some("sold"))]
    #[tokio::test]
    async fn status_must_be_available_or_sold(#[case] status: Option<&str>) {
        let catalog = service();
        let sam = account("Sam");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");

        assert_eq!(
            catalog.update_status(product.id.as_str(), &sam, status).await,
            Err(DomainError::validation("Status must be either 'Available' or 'Sold'"))
        );
    }

    #[tokio::test]
    async fn status_toggles_between_available_and_sold() {
        let catalog = service();
        let sam = account("Sam");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");
        let id = product.id.as_str();

        let sold = catalog.update_status(id, &sam, Some("Sold")).await.expect("sold");
        assert_eq!(sold.status, ProductStatus::Sold);
        let back = catalog.update_status(id, &sam, Some("Available")).await.expect("relisted");
        assert_eq!(back.status, ProductStatus::Available);
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let catalog = service();
        let sam = account("Sam");
        let product = catalog
            .create_listing(&sam, submission("Chair", "Furniture", 10.0))
            .await
            .expect("created");
        let id = product.id.as_str();

        catalog.delete_product(id, &sam).await.expect("deleted");

        assert_eq!(catalog.get_product(id).await, Err(product_not_found()));
        assert_eq!(catalog.delete_product(id, &sam).await, Err(product_not_found()));
    }
}
