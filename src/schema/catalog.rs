//! Required and optional properties per supported `@type`

/// Field contract of one schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaType {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl SchemaType {
    /// True if `field` is part of the contract
    pub fn declares(&self, field: &str) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }
}

pub const CATALOG: &[SchemaType] = &[
    SchemaType {
        name: "Product",
        required: &["name", "image", "description"],
        optional: &["brand", "offers", "sku", "gtin", "aggregateRating", "review"],
    },
    SchemaType {
        name: "Organization",
        required: &["name", "url"],
        optional: &["logo", "description", "sameAs", "contactPoint", "address"],
    },
    SchemaType {
        name: "LocalBusiness",
        required: &["name", "address"],
        optional: &["telephone", "openingHours", "geo", "url", "priceRange", "image"],
    },
    SchemaType {
        name: "Review",
        required: &["itemReviewed", "reviewRating", "author"],
        optional: &["datePublished", "reviewBody", "publisher"],
    },
    SchemaType {
        name: "BreadcrumbList",
        required: &["itemListElement"],
        optional: &["name"],
    },
    SchemaType {
        name: "Event",
        required: &["name", "startDate", "location"],
        optional: &[
            "endDate",
            "description",
            "image",
            "offers",
            "organizer",
            "performer",
            "eventStatus",
        ],
    },
    SchemaType {
        name: "Article",
        required: &["headline", "author", "datePublished"],
        optional: &["image", "publisher", "dateModified", "description"],
    },
    SchemaType {
        name: "FAQPage",
        required: &["mainEntity"],
        optional: &["name"],
    },
];

/// Finds the contract for `name` (exact, case-sensitive as in JSON-LD)
pub fn lookup(name: &str) -> Option<&'static SchemaType> {
    CATALOG.iter().find(|schema_type| schema_type.name == name)
}

/// Names of every supported type, in catalog order
pub fn supported_types() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|schema_type| schema_type.name)
}
