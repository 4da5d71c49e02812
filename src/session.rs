// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! A mounted contact form.
//!
//! While a session is alive a background task ticks the form every poll
//! interval, keeping the rate limit countdown fresh and firing the
//! post-success reset. Shutting the session down (or dropping it) aborts
//! the task, so no timer touches the form afterwards.
//!
//! The form lock is not held while the delivery call is in flight.

use crate::clock::Clock;
use crate::delivery::{send_with_timeout, DeliveryClient};
use crate::error::SubmitError;
use crate::form::{ContactForm, FormView};
use crate::validator::Field;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct FormSession<C: Clock + 'static> {
    form: Arc<Mutex<ContactForm<C>>>,
    ticker: Option<JoinHandle<()>>,
}

impl<C: Clock + 'static> FormSession<C> {
    /// Mount a form and start its ticker. Must be called inside a Tokio runtime.
    pub fn mount(form: ContactForm<C>) -> Self {
        let period = form.config().rate_limit.poll_interval();
        let form = Arc::new(Mutex::new(form));

        let ticking = Arc::clone(&form);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                ticking.lock().await.tick();
            }
        });

        debug!("Contact form mounted");
        Self {
            form,
            ticker: Some(ticker),
        }
    }

    /// Shared handle to the underlying form.
    pub fn form(&self) -> Arc<Mutex<ContactForm<C>>> {
        Arc::clone(&self.form)
    }

    pub async fn on_field_change(&self, field: Field, raw: &str) {
        self.form.lock().await.on_field_change(field, raw);
    }

    pub async fn view(&self) -> FormView {
        self.form.lock().await.view()
    }

    /// Submit the form through `client`.
    pub async fn submit<D: DeliveryClient + ?Sized>(&self, client: &D) -> Result<(), SubmitError> {
        let (payload, timeout) = {
            let mut form = self.form.lock().await;
            let payload = form.begin_submit()?;
            (payload, form.config().form.delivery_timeout())
        };

        let outcome = send_with_timeout(client, &payload, timeout).await;
        self.form.lock().await.finish_submit(outcome)
    }

    /// Tear the session down and wait for the ticker to stop.
    pub async fn shutdown(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            let _ = ticker.await;
        }
        debug!("Contact form unmounted");
    }
}

impl<C: Clock + 'static> Drop for FormSession<C> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}
