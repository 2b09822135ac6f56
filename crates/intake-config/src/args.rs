//! Command-line and environment surface for the intake service.

use std::net::IpAddr;

use clap::Parser;

/// Raw settings as supplied on the command line or through `INTAKE_*`
/// environment variables. Converted into [`crate::IntakeConfig`] by
/// [`crate::IntakeConfig::from_args`].
#[derive(Debug, Clone, Parser)]
#[command(name = "intake", version, about = "Application intake bridge for the task tracker")]
pub struct IntakeArgs {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "INTAKE_BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: IpAddr,

    /// Port the HTTP listener binds to.
    #[arg(long, env = "INTAKE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Blanket deadline applied to every inbound request, in seconds.
    #[arg(long, env = "INTAKE_REQUEST_DEADLINE_SECS", default_value_t = 300)]
    pub request_deadline_secs: u64,

    /// Largest accepted video part, in bytes.
    #[arg(long, env = "INTAKE_MAX_VIDEO_BYTES", default_value_t = 300 * 1024 * 1024)]
    pub max_video_bytes: usize,

    /// Default log level when `RUST_LOG` is unset.
    #[arg(long, env = "INTAKE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (`json`, `pretty` or `auto`).
    #[arg(long, env = "INTAKE_LOG_FORMAT", default_value = "auto")]
    pub log_format: String,

    /// Base URL of the task tracker REST API.
    #[arg(
        long,
        env = "INTAKE_TRACKER_BASE_URL",
        default_value = "https://api.clickup.com/api/v2"
    )]
    pub tracker_base_url: String,

    /// API token sent in the `Authorization` header.
    #[arg(long, env = "INTAKE_TRACKER_TOKEN", hide_env_values = true)]
    pub tracker_token: Option<String>,

    /// List that receives application tasks and defines the custom fields.
    #[arg(long, env = "INTAKE_TRACKER_LIST_ID")]
    pub tracker_list_id: Option<String>,

    /// Timeout for a single outbound tracker call, in seconds. Defaults to
    /// the request deadline so large video uploads are not cut short.
    #[arg(long, env = "INTAKE_TRACKER_TIMEOUT_SECS")]
    pub tracker_timeout_secs: Option<u64>,

    /// Custom field id for the applicant email.
    #[arg(long, env = "INTAKE_FIELD_EMAIL")]
    pub field_email: Option<String>,

    /// Custom field id for the applicant phone number.
    #[arg(long, env = "INTAKE_FIELD_PHONE")]
    pub field_phone: Option<String>,

    /// Custom field id for the applicant location.
    #[arg(long, env = "INTAKE_FIELD_LOCATION")]
    pub field_location: Option<String>,

    /// Custom field id for the `LinkedIn` profile URL.
    #[arg(long, env = "INTAKE_FIELD_LINKEDIN")]
    pub field_linkedin: Option<String>,

    /// Custom field id for the education level.
    #[arg(long, env = "INTAKE_FIELD_EDUCATION")]
    pub field_education: Option<String>,

    /// Custom field id for work eligibility.
    #[arg(long, env = "INTAKE_FIELD_WORK_ELIGIBILITY")]
    pub field_work_eligibility: Option<String>,

    /// Custom field id for years of experience.
    #[arg(long, env = "INTAKE_FIELD_EXPERIENCE")]
    pub field_experience: Option<String>,

    /// Custom field id for the current role.
    #[arg(long, env = "INTAKE_FIELD_CURRENT_ROLE")]
    pub field_current_role: Option<String>,

    /// Custom field id for the referral source.
    #[arg(long, env = "INTAKE_FIELD_REFERRAL_SOURCE")]
    pub field_referral_source: Option<String>,

    /// Custom field id for availability.
    #[arg(long, env = "INTAKE_FIELD_AVAILABILITY")]
    pub field_availability: Option<String>,

    /// Custom field id for the motivation statement.
    #[arg(long, env = "INTAKE_FIELD_MOTIVATION")]
    pub field_motivation: Option<String>,

    /// Custom field that receives the uploaded video URL.
    #[arg(long, env = "INTAKE_FIELD_VIDEO_URL")]
    pub field_video_url: Option<String>,

    /// Custom field that receives the guarantee PDF URL.
    #[arg(long, env = "INTAKE_FIELD_GUARANTEE_URL")]
    pub field_guarantee_url: Option<String>,

    /// Dropdown field holding the cohort assignment.
    #[arg(long, env = "INTAKE_FIELD_COHORT")]
    pub field_cohort: Option<String>,

    /// Dropdown field holding the payment method.
    #[arg(long, env = "INTAKE_FIELD_PAYMENT_METHOD")]
    pub field_payment_method: Option<String>,

    /// Display label of the first cohort.
    #[arg(long, env = "INTAKE_COHORT_A_LABEL", default_value = "October")]
    pub cohort_a_label: String,

    /// Comma separated keywords selecting the first cohort.
    #[arg(
        long,
        env = "INTAKE_COHORT_A_KEYWORDS",
        value_delimiter = ',',
        default_value = "DTCA-2502,october"
    )]
    pub cohort_a_keywords: Vec<String>,

    /// Dropdown option id of the first cohort.
    #[arg(long, env = "INTAKE_COHORT_A_OPTION_ID")]
    pub cohort_a_option_id: Option<String>,

    /// Display label of the second cohort.
    #[arg(long, env = "INTAKE_COHORT_B_LABEL", default_value = "January")]
    pub cohort_b_label: String,

    /// Comma separated keywords selecting the second cohort.
    #[arg(
        long,
        env = "INTAKE_COHORT_B_KEYWORDS",
        value_delimiter = ',',
        default_value = "DTCA-2601,january"
    )]
    pub cohort_b_keywords: Vec<String>,

    /// Dropdown option id of the second cohort.
    #[arg(long, env = "INTAKE_COHORT_B_OPTION_ID")]
    pub cohort_b_option_id: Option<String>,

    /// Payment-method option id for paying upfront.
    #[arg(long, env = "INTAKE_PAYMENT_UPFRONT_OPTION_ID")]
    pub payment_upfront_option_id: Option<String>,

    /// Payment-method option id for instalment plans.
    #[arg(long, env = "INTAKE_PAYMENT_INSTALLMENTS_OPTION_ID")]
    pub payment_installments_option_id: Option<String>,

    /// Payment-method option id for third-party financing.
    #[arg(long, env = "INTAKE_PAYMENT_FINANCING_OPTION_ID")]
    pub payment_financing_option_id: Option<String>,
}
