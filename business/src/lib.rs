pub mod application {
    pub mod product {
        pub mod create;
        pub mod delete;
        pub mod get_all;
        pub mod get_by_id;
        pub mod get_categories;
        pub mod update;
    }
}

pub mod domain {
    pub mod cache;
    pub mod errors;
    pub mod logger;
    pub mod product {
        pub mod errors;
        pub mod model;
        pub mod patch;
        pub mod repository;
        pub mod validation;
        pub mod use_cases {
            pub mod create;
            pub mod delete;
            pub mod get_all;
            pub mod get_by_id;
            pub mod get_categories;
            pub mod update;
        }
    }
}
