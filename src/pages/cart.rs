//! Add-to-cart view, loaded only when the product page's action fires.

use crate::render::{
    XmlWriter,
    common::{write_end, write_start, write_text_element},
};
use anyhow::Result;
use async_trait::async_trait;

/// What to mount below the add-to-cart button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub heading: String,
    pub body: String,
}

impl ViewDescriptor {
    pub fn write(&self, writer: &mut XmlWriter) -> Result<()> {
        write_start(writer, "aside", &[("class", "cart-view")])?;
        write_text_element(writer, "h2", &self.heading)?;
        write_text_element(writer, "p", &self.body)?;
        write_end(writer, "aside")
    }
}

/// Loads the cart view on demand.
#[async_trait]
pub trait CartViewLoader: Send + Sync {
    async fn load(&self) -> Result<ViewDescriptor>;
}

/// Placeholder view until a real cart exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubCartView;

#[async_trait]
impl CartViewLoader for StubCartView {
    async fn load(&self) -> Result<ViewDescriptor> {
        Ok(ViewDescriptor {
            heading: "Add to cart".into(),
            body: "Your cart is not available yet.".into(),
        })
    }
}
