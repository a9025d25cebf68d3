//! CreatePaymentRequestHandler - Command handler for starting a plan checkout.
//!
//! Turns a caller's plan choice into either an activated free trial or a
//! redirect to the gateway's hosted payment page.

use std::sync::Arc;

use serde::ser::{Serialize, Serializer};

use crate::domain::billing::{
    BuildOutcome, CheckoutCustomer, Currency, OrderReference, PaymentRequestBuilder, PlanType,
    TransactionStatus,
};
use crate::domain::foundation::UserId;
use crate::ports::{PaymentError, PaymentErrorKind, PaymentGateway};

pub const REDIRECT_MESSAGE: &str = "Redirecting to payment gateway";
pub const FREE_TRIAL_MESSAGE: &str = "Free trial activated";

/// Command to start a checkout.
///
/// Plan and currency arrive as caller strings and are parsed here.
#[derive(Debug, Clone)]
pub struct CreatePaymentRequestCommand {
    pub plan_type: String,
    pub currency: Option<String>,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutResult {
    /// Paid plan accepted by the gateway; send the customer to `payment_url`.
    Redirect {
        payment_url: String,
        transaction_id: Option<String>,
        order_reference: OrderReference,
        transaction_status: TransactionStatus,
    },
    /// Free trial granted without contacting the gateway.
    FreeTrialActivated { transaction_status: TransactionStatus },
    /// Checkout could not be started.
    Failed(PaymentError),
}

impl CheckoutResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, CheckoutResult::Failed(_))
    }

    pub fn error_kind(&self) -> Option<PaymentErrorKind> {
        match self {
            CheckoutResult::Failed(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Where the transaction stands after this attempt; `None` on failure.
    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        match self {
            CheckoutResult::Redirect {
                transaction_status, ..
            }
            | CheckoutResult::FreeTrialActivated { transaction_status } => Some(*transaction_status),
            CheckoutResult::Failed(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CheckoutResult::Redirect { .. } => REDIRECT_MESSAGE,
            CheckoutResult::FreeTrialActivated { .. } => FREE_TRIAL_MESSAGE,
            CheckoutResult::Failed(e) => &e.message,
        }
    }
}

/// Caller-facing JSON shape of a [`CheckoutResult`].
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResultBody<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<PaymentErrorKind>,
    message: &'a str,
}

impl Serialize for CheckoutResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = CheckoutResultBody {
            success: self.is_success(),
            payment_url: None,
            transaction_id: None,
            order_reference: None,
            error: self.error_kind(),
            message: self.message(),
        };
        if let CheckoutResult::Redirect {
            payment_url,
            transaction_id,
            order_reference,
            ..
        } = self
        {
            body.payment_url = Some(payment_url);
            body.transaction_id = transaction_id.as_deref();
            body.order_reference = Some(order_reference.as_str());
        }
        body.serialize(serializer)
    }
}

/// Handler for starting a plan checkout.
pub struct CreatePaymentRequestHandler {
    builder: Arc<PaymentRequestBuilder>,
    gateway: Arc<dyn PaymentGateway>,
    default_currency: Currency,
}

impl CreatePaymentRequestHandler {
    pub fn new(builder: Arc<PaymentRequestBuilder>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            builder,
            gateway,
            default_currency: Currency::default(),
        }
    }

    /// Currency used when the caller does not name one.
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    pub async fn handle(&self, cmd: CreatePaymentRequestCommand) -> CheckoutResult {
        match self.try_handle(cmd).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(error_kind = %error.kind, message = %error.message, "Checkout failed");
                CheckoutResult::Failed(error)
            }
        }
    }

    async fn try_handle(&self, cmd: CreatePaymentRequestCommand) -> Result<CheckoutResult, PaymentError> {
        // 1. Parse caller input (free trial needs nothing past the plan)
        let plan = cmd
            .plan_type
            .parse::<PlanType>()
            .map_err(|e| PaymentError::invalid_plan(e.to_string()))?;

        if plan == PlanType::FreeTrial {
            let transaction_status = TransactionStatus::Initiated.activate_free_trial()?;
            tracing::info!(user_id = %cmd.user_id, "Free trial activated without gateway call");
            return Ok(CheckoutResult::FreeTrialActivated { transaction_status });
        }

        let currency = match cmd.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(code) => code
                .parse::<Currency>()
                .map_err(|e| PaymentError::invalid_plan(e.to_string()))?,
            None => self.default_currency,
        };

        let customer = CheckoutCustomer {
            user_id: UserId::new(cmd.user_id)?,
            email: cmd.user_email,
            name: cmd.user_name,
            phone: cmd.user_phone,
        };

        // 2. Build the signed request
        let request = match self.builder.build(plan, currency, &customer)? {
            BuildOutcome::FreeTrialActivated => {
                return Ok(CheckoutResult::FreeTrialActivated {
                    transaction_status: TransactionStatus::Initiated.activate_free_trial()?,
                })
            }
            BuildOutcome::Payment(request) => request,
        };

        // 3. Submit to the gateway
        let session = self.gateway.send(&request).await?;
        let transaction_status = TransactionStatus::Initiated.mark_submitted()?;

        tracing::info!(
            user_id = %customer.user_id,
            order_reference = %request.order_reference,
            plan = %plan,
            "Checkout redirected to payment gateway"
        );

        Ok(CheckoutResult::Redirect {
            payment_url: session.payment_url,
            transaction_id: session.transaction_id,
            order_reference: request.order_reference,
            transaction_status,
        })
    }
}
