use std::fmt;
use std::sync::Arc;

/// Named invalidation key grouping one or more cached reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Products,
    Categories,
    Product(i32),
    Category(String),
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTag::Products => write!(f, "products"),
            CacheTag::Categories => write!(f, "categories"),
            CacheTag::Product(id) => write!(f, "product-{}", id),
            CacheTag::Category(name) => write!(f, "category-{}", name),
        }
    }
}

/// A committed change to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created {
        id: i32,
        category: String,
    },
    Updated {
        id: i32,
        /// Category before the update, when the caller knew it.
        previous_category: Option<String>,
        /// Category set by the update, if the patch carried one.
        category: Option<String>,
    },
    Deleted {
        id: i32,
        category: Option<String>,
    },
}

impl Mutation {
    /// Tags whose cached reads this mutation makes stale.
    ///
    /// `categories` is only included when the category set may have changed.
    pub fn tags(&self) -> Vec<CacheTag> {
        match self {
            Mutation::Created { id, category } => vec![
                CacheTag::Products,
                CacheTag::Product(*id),
                CacheTag::Categories,
                CacheTag::Category(category.clone()),
            ],
            Mutation::Updated {
                id,
                previous_category,
                category,
            } => {
                let mut tags = vec![CacheTag::Products, CacheTag::Product(*id)];
                if let Some(new) = category
                    && previous_category.as_ref() != Some(new)
                {
                    tags.push(CacheTag::Categories);
                    if let Some(previous) = previous_category {
                        tags.push(CacheTag::Category(previous.clone()));
                    }
                    tags.push(CacheTag::Category(new.clone()));
                }
                tags
            }
            Mutation::Deleted { id, category } => {
                let mut tags = vec![
                    CacheTag::Products,
                    CacheTag::Product(*id),
                    CacheTag::Categories,
                ];
                if let Some(category) = category {
                    tags.push(CacheTag::Category(category.clone()));
                }
                tags
            }
        }
    }
}

/// Receives invalidation signals after a mutation has been committed.
///
/// Implementations must not fail: the mutation result never depends on them.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, tags: &[CacheTag]);
}

/// Post-commit hook list notified after every successful mutation.
#[derive(Clone, Default)]
pub struct InvalidationHooks {
    hooks: Vec<Arc<dyn CacheInvalidator>>,
}

impl InvalidationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn CacheInvalidator>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Notifies every hook and returns the tags that were published.
    pub fn publish(&self, mutation: &Mutation) -> Vec<CacheTag> {
        let tags = mutation.tags();
        for hook in &self.hooks {
            hook.invalidate(&tags);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHook {
        received: Mutex<Vec<Vec<CacheTag>>>,
    }

    impl CacheInvalidator for RecordingHook {
        fn invalidate(&self, tags: &[CacheTag]) {
            self.received.lock().unwrap().push(tags.to_vec());
        }
    }

    #[test]
    fn should_render_tag_names() {
        assert_eq!(CacheTag::Products.to_string(), "products");
        assert_eq!(CacheTag::Categories.to_string(), "categories");
        assert_eq!(CacheTag::Product(12).to_string(), "product-12");
        assert_eq!(
            CacheTag::Category("home".to_string()).to_string(),
            "category-home"
        );
    }

    #[test]
    fn should_invalidate_categories_on_create() {
        let tags = Mutation::Created {
            id: 1,
            category: "home".to_string(),
        }
        .tags();

        assert!(tags.contains(&CacheTag::Products));
        assert!(tags.contains(&CacheTag::Product(1)));
        assert!(tags.contains(&CacheTag::Categories));
        assert!(tags.contains(&CacheTag::Category("home".to_string())));
    }

    #[test]
    fn should_not_invalidate_categories_when_update_keeps_category() {
        let unchanged = Mutation::Updated {
            id: 1,
            previous_category: Some("home".to_string()),
            category: Some("home".to_string()),
        }
        .tags();
        let no_category = Mutation::Updated {
            id: 1,
            previous_category: Some("home".to_string()),
            category: None,
        }
        .tags();

        assert_eq!(unchanged, vec![CacheTag::Products, CacheTag::Product(1)]);
        assert_eq!(no_category, vec![CacheTag::Products, CacheTag::Product(1)]);
    }

    #[test]
    fn should_invalidate_both_categories_when_update_moves_product() {
        let tags = Mutation::Updated {
            id: 4,
            previous_category: Some("home".to_string()),
            category: Some("garden".to_string()),
        }
        .tags();

        assert!(tags.contains(&CacheTag::Categories));
        assert!(tags.contains(&CacheTag::Category("home".to_string())));
        assert!(tags.contains(&CacheTag::Category("garden".to_string())));
    }

    #[test]
    fn should_invalidate_categories_on_delete() {
        let tags = Mutation::Deleted {
            id: 9,
            category: None,
        }
        .tags();

        assert_eq!(
            tags,
            vec![
                CacheTag::Products,
                CacheTag::Product(9),
                CacheTag::Categories
            ]
        );
    }

    #[test]
    fn should_notify_every_registered_hook() {
        let first = Arc::new(RecordingHook::default());
        let second = Arc::new(RecordingHook::default());
        let mut hooks = InvalidationHooks::new();
        hooks.register(first.clone());
        hooks.register(second.clone());

        let published = hooks.publish(&Mutation::Deleted {
            id: 2,
            category: Some("toys".to_string()),
        });

        assert_eq!(hooks.len(), 2);
        assert_eq!(first.received.lock().unwrap().as_slice(), &[published.clone()]);
        assert_eq!(second.received.lock().unwrap().as_slice(), &[published]);
    }
}
