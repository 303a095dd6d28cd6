//! Test Helpers

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::Subscriber;

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            data::AddCartItem,
            models::{CartId, CartItem},
        },
        products::models::ProductId,
        session::{
            Notifier,
            models::{User, UserId},
        },
    },
    test::TestContext,
};

pub(crate) async fn add(
    ctx: &TestContext,
    cart: CartId,
    product: u64,
    quantity: u32,
) -> Result<CartItem, CartsServiceError> {
    ctx.carts
        .add_item(
            cart,
            AddCartItem {
                product_id: ProductId::new(product),
                quantity,
            },
        )
        .await
}

pub(crate) fn user(id: u64) -> User {
    User::new(UserId::new(id), format!("user{id}@example.com"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notification {
    Success { message: String, title: String },
    Error { message: String, title: String },
}

impl Notification {
    pub(crate) fn success(message: &str, title: &str) -> Self {
        Self::Success {
            message: message.to_string(),
            title: title.to_string(),
        }
    }

    pub(crate) fn error(message: &str, title: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            title: title.to_string(),
        }
    }
}

/// Notifier that keeps everything it is told.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Drain recorded notifications.
    pub(crate) fn take(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut seen| std::mem::take(&mut *seen))
            .unwrap_or_default()
    }

    fn push(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str, title: &str) {
        self.push(Notification::success(message, title));
    }

    fn error(&self, message: &str, title: &str) {
        self.push(Notification::error(message, title));
    }
}

/// Log sink collecting formatted events in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Plain-text subscriber writing every level into this capture.
    pub(crate) fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        let sink = self.clone();

        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || sink.clone())
            .finish()
    }

    /// Captured lines.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|buffer| {
                String::from_utf8_lossy(&buffer)
                    .lines()
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(bytes);
        }

        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
