pub mod admin_user;
pub mod auth;
pub mod company;
pub mod payment;
pub mod pre_registration;
pub mod pricing_plan;
pub mod subscription;
pub mod support_ticket;
pub mod user;
pub mod verification_token;
pub mod visit;
pub mod visitor;

// Re-export common types
pub use admin_user::{AdminUser, AdminUserUpdate, NewAdminUser};
pub use auth::{AccessTokenClaims, AdminTokenClaims};
pub use company::{Company, CompanyStatus, NewCompany};
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use pre_registration::{NewPreRegistration, PreRegistration, PreRegistrationStatus};
pub use pricing_plan::{NewPricingPlan, PricingPlan, PricingPlanUpdate};
pub use subscription::{BillingPlan, NewSubscription, Subscription, SubscriptionStatus};
pub use support_ticket::{NewSupportTicket, SupportTicket, TicketPriority, TicketStatus, TicketUpdate};
pub use user::{NewUser, User, UserError};
pub use verification_token::{EmailVerificationToken, NewEmailVerificationToken};
pub use visit::{NewVisit, Visit, VisitStatus};
pub use visitor::{NewVisitor, Visitor};
