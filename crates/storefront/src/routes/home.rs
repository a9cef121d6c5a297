//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::VisitorSession;
use crate::models::Layout;

/// A category card in the "what we deliver" grid.
pub struct CategoryCard {
    pub title: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
}

/// Categories shown on the landing page.
pub const CATEGORIES: [CategoryCard; 6] = [
    CategoryCard {
        title: "Groceries",
        description: "Fresh produce and pantry staples from your neighborhood stores",
        image_url: "https://images.unsplash.com/photo-1542838132-92c53300491e?auto=format&fit=crop&w=800&q=80",
    },
    CategoryCard {
        title: "Stationery",
        description: "Books, notebooks, and office supplies from nearby shops",
        image_url: "https://images.unsplash.com/photo-1456735190827-d1262f71b8a3?auto=format&fit=crop&w=800&q=80",
    },
    CategoryCard {
        title: "Fashion",
        description: "Clothing, accessories and footwear from local boutiques",
        image_url: "https://images.unsplash.com/photo-1445205170230-053b83016050?auto=format&fit=crop&w=800&q=80",
    },
    CategoryCard {
        title: "Home Decor",
        description: "Furniture, decorations and home essentials from neighborhood stores",
        image_url: "https://images.unsplash.com/photo-1513694203232-719a280e022f?auto=format&fit=crop&w=800&q=80",
    },
    CategoryCard {
        title: "Bakery",
        description: "Fresh baked goods from local bakeries",
        image_url: "https://images.unsplash.com/photo-1509440159596-0249088772ff?auto=format&fit=crop&w=800&q=80",
    },
    CategoryCard {
        title: "Specialty Stores",
        description: "Unique finds from specialty boutiques in your neighborhood",
        image_url: "https://images.unsplash.com/photo-1441986300917-64674bd600d8?auto=format&fit=crop&w=800&q=80",
    },
];

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: &'static [CategoryCard],
}

/// Display the landing page.
#[instrument(skip(visit))]
pub async fn index(visit: VisitorSession) -> Result<impl IntoResponse> {
    Ok(HomeTemplate {
        layout: visit.layout().await?,
        categories: &CATEGORIES,
    })
}
