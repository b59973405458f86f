//! Attach a derived value to each item of a page of results.
//!
//! Listings show per-question answer counts next to each row. The derive
//! step issues one auxiliary lookup per item; at forum data volumes that is
//! acceptable, and the lookups run sequentially within the request.

use std::future::Future;

use crate::shared::errors::AppError;

/// Pair every item with a derived value, preserving input order.
///
/// `derive` receives each item by reference and must return a future that
/// owns whatever it needs (typically the item id and a database handle).
pub async fn assemble<T, D, F, Fut>(items: Vec<T>, mut derive: F) -> Result<Vec<(T, D)>, AppError>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<D, AppError>>,
{
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let derived = derive(&item).await?;
        out.push((item, derived));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::DomainError;

    #[tokio::test]
    async fn preserves_order_and_pairs_one_value_per_item() {
        let items = vec![10_i32, 20, 30];
        let rows = assemble(items, |n| {
            let n = *n;
            async move { Ok(n * 2) }
        })
        .await
        .unwrap();

        assert_eq!(rows, vec![(10, 20), (20, 40), (30, 60)]);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let rows: Vec<(i32, i32)> = assemble(vec![], |_| async { Ok(0) }).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn first_failing_lookup_aborts_the_listing() {
        let items = vec![1_i32, 2, 3];
        let result = assemble(items, |n| {
            let n = *n;
            async move {
                if n == 2 {
                    Err(AppError::Domain(DomainError::Validation("bad".into())))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn derive_sees_items_in_input_order() {
        let items = vec!["a", "b", "c"];
        let mut seen = Vec::new();
        let rows = assemble(items, |s| {
            seen.push(*s);
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(rows.len(), 3);
    }
}
