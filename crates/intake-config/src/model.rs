//! Validated configuration models.
//!
//! # Design
//! - Field ids are opaque strings owned by the tracker; this module only says
//!   which id means what.
//! - Unset optional field ids mean "do not send this field", never an error.

use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::args::IntakeArgs;
use crate::error::{ConfigError, ConfigResult};

/// Fully validated configuration for the intake process.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Listener and logging settings.
    pub server: ServerSettings,
    /// Task tracker connection settings.
    pub tracker: TrackerSettings,
    /// Meaning of the tracker's custom field ids.
    pub fields: FieldMap,
    /// Cohort keyword catalog.
    pub cohorts: CohortCatalog,
    /// Payment-method option catalog.
    pub payments: PaymentCatalog,
}

/// Listener and logging settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Socket address for the HTTP listener.
    pub addr: SocketAddr,
    /// Blanket per-request deadline.
    pub request_deadline: Duration,
    /// Cap on the video part of an application submission.
    pub max_video_bytes: usize,
    /// Default log level.
    pub log_level: String,
    /// Requested log format (`json`, `pretty`, `auto`).
    pub log_format: String,
}

/// Task tracker connection settings.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    /// REST API base URL, without a trailing slash.
    pub base_url: Url,
    /// Token sent verbatim in the `Authorization` header.
    pub token: String,
    /// List receiving application tasks.
    pub list_id: String,
    /// Per-call timeout.
    pub timeout: Duration,
}

/// Applicant answers that map onto tracker custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantField {
    /// Contact email.
    Email,
    /// Contact phone number.
    Phone,
    /// City / region.
    Location,
    /// `LinkedIn` profile URL.
    Linkedin,
    /// Highest education level.
    Education,
    /// Right-to-work status.
    WorkEligibility,
    /// Years of experience.
    Experience,
    /// Current job title.
    CurrentRole,
    /// How the applicant heard about the program.
    ReferralSource,
    /// When the applicant can start.
    Availability,
    /// Free-form motivation statement.
    Motivation,
}

impl ApplicantField {
    /// Every applicant field, in the order they are pushed onto a task.
    pub const ALL: [Self; 11] = [
        Self::Email,
        Self::Phone,
        Self::Location,
        Self::Linkedin,
        Self::Education,
        Self::WorkEligibility,
        Self::Experience,
        Self::CurrentRole,
        Self::ReferralSource,
        Self::Availability,
        Self::Motivation,
    ];

    /// Canonical submission keys (lowercase, separators removed) accepted for
    /// this field. The first entry is the preferred one.
    #[must_use]
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Email => &["email", "emailaddress"],
            Self::Phone => &["phone", "phonenumber", "mobile"],
            Self::Location => &["location", "city"],
            Self::Linkedin => &["linkedin", "linkedinurl", "linkedinprofile"],
            Self::Education => &["education", "educationlevel"],
            Self::WorkEligibility => &["workeligibility", "workauthorization", "eligibility"],
            Self::Experience => &["experience", "yearsofexperience", "yearsexperience"],
            Self::CurrentRole => &["currentrole", "jobtitle", "currenttitle"],
            Self::ReferralSource => &["referralsource", "howdidyouhear", "source"],
            Self::Availability => &["availability", "starttime"],
            Self::Motivation => &["motivation", "whyapply", "why"],
        }
    }

    /// Human label used when composing the task description.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Location => "Location",
            Self::Linkedin => "LinkedIn",
            Self::Education => "Education",
            Self::WorkEligibility => "Work eligibility",
            Self::Experience => "Experience",
            Self::CurrentRole => "Current role",
            Self::ReferralSource => "Referral source",
            Self::Availability => "Availability",
            Self::Motivation => "Motivation",
        }
    }
}

/// Mapping from meaning to tracker custom field id.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    /// Contact email field.
    pub email: Option<String>,
    /// Contact phone field.
    pub phone: Option<String>,
    /// Location field.
    pub location: Option<String>,
    /// `LinkedIn` URL field.
    pub linkedin: Option<String>,
    /// Education dropdown.
    pub education: Option<String>,
    /// Work eligibility dropdown; also selects the eligibility heuristic.
    pub work_eligibility: Option<String>,
    /// Experience dropdown.
    pub experience: Option<String>,
    /// Current role field.
    pub current_role: Option<String>,
    /// Referral source dropdown.
    pub referral_source: Option<String>,
    /// Availability dropdown.
    pub availability: Option<String>,
    /// Motivation text field.
    pub motivation: Option<String>,
    /// Field receiving the uploaded video URL.
    pub video_url: Option<String>,
    /// Field receiving the guarantee PDF URL.
    pub guarantee_url: Option<String>,
    /// Cohort dropdown.
    pub cohort: String,
    /// Payment-method dropdown.
    pub payment_method: String,
}

impl FieldMap {
    /// Field id configured for an applicant answer, if any.
    #[must_use]
    pub fn applicant_field(&self, field: ApplicantField) -> Option<&str> {
        let id = match field {
            ApplicantField::Email => &self.email,
            ApplicantField::Phone => &self.phone,
            ApplicantField::Location => &self.location,
            ApplicantField::Linkedin => &self.linkedin,
            ApplicantField::Education => &self.education,
            ApplicantField::WorkEligibility => &self.work_eligibility,
            ApplicantField::Experience => &self.experience,
            ApplicantField::CurrentRole => &self.current_role,
            ApplicantField::ReferralSource => &self.referral_source,
            ApplicantField::Availability => &self.availability,
            ApplicantField::Motivation => &self.motivation,
        };
        id.as_deref()
    }
}

/// One selectable cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortOption {
    /// Display label (e.g. `October`).
    pub label: String,
    /// Keywords that select this cohort, matched on word boundaries.
    pub keywords: Vec<String>,
    /// Dropdown option id in the cohort field.
    pub option_id: String,
}

/// The two cohorts open for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortCatalog {
    /// Cohort options checked in order.
    pub options: [CohortOption; 2],
}

/// Supported payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in full before the cohort starts.
    Upfront,
    /// Split across scheduled instalments.
    Installments,
    /// Paid through a financing partner.
    Financing,
}

impl PaymentMethod {
    /// Stable key used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upfront => "upfront",
            Self::Installments => "installments",
            Self::Financing => "financing",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "upfront" => Ok(Self::Upfront),
            "installments" | "instalments" => Ok(Self::Installments),
            "financing" => Ok(Self::Financing),
            _ => Err(format!("unknown payment method '{}'", value.trim())),
        }
    }
}

/// Option ids of the payment-method dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCatalog {
    /// Option id for [`PaymentMethod::Upfront`].
    pub upfront: String,
    /// Option id for [`PaymentMethod::Installments`].
    pub installments: String,
    /// Option id for [`PaymentMethod::Financing`].
    pub financing: String,
}

impl PaymentCatalog {
    /// Option id for the given method.
    #[must_use]
    pub fn option_id(&self, method: PaymentMethod) -> &str {
        match method {
            PaymentMethod::Upfront => &self.upfront,
            PaymentMethod::Installments => &self.installments,
            PaymentMethod::Financing => &self.financing,
        }
    }
}

impl IntakeConfig {
    /// Validate raw arguments into a usable configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or malformed setting.
    pub fn from_args(args: IntakeArgs) -> ConfigResult<Self> {
        if args.port == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "INTAKE_PORT",
                value: args.port.to_string(),
                reason: "zero",
            });
        }
        if args.request_deadline_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "INTAKE_REQUEST_DEADLINE_SECS",
                value: args.request_deadline_secs.to_string(),
                reason: "zero",
            });
        }
        if args.max_video_bytes == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "INTAKE_MAX_VIDEO_BYTES",
                value: args.max_video_bytes.to_string(),
                reason: "zero",
            });
        }

        let base_url = parse_base_url(&args.tracker_base_url)?;
        let tracker = TrackerSettings {
            base_url,
            token: required(args.tracker_token, "INTAKE_TRACKER_TOKEN")?,
            list_id: required(args.tracker_list_id, "INTAKE_TRACKER_LIST_ID")?,
            timeout: Duration::from_secs(
                args.tracker_timeout_secs
                    .unwrap_or(args.request_deadline_secs)
                    .max(1),
            ),
        };

        let fields = FieldMap {
            email: optional(args.field_email),
            phone: optional(args.field_phone),
            location: optional(args.field_location),
            linkedin: optional(args.field_linkedin),
            education: optional(args.field_education),
            work_eligibility: optional(args.field_work_eligibility),
            experience: optional(args.field_experience),
            current_role: optional(args.field_current_role),
            referral_source: optional(args.field_referral_source),
            availability: optional(args.field_availability),
            motivation: optional(args.field_motivation),
            video_url: optional(args.field_video_url),
            guarantee_url: optional(args.field_guarantee_url),
            cohort: required(args.field_cohort, "INTAKE_FIELD_COHORT")?,
            payment_method: required(args.field_payment_method, "INTAKE_FIELD_PAYMENT_METHOD")?,
        };

        let cohorts = CohortCatalog {
            options: [
                cohort_option(
                    args.cohort_a_label,
                    args.cohort_a_keywords,
                    args.cohort_a_option_id,
                    "INTAKE_COHORT_A_OPTION_ID",
                    "INTAKE_COHORT_A_KEYWORDS",
                )?,
                cohort_option(
                    args.cohort_b_label,
                    args.cohort_b_keywords,
                    args.cohort_b_option_id,
                    "INTAKE_COHORT_B_OPTION_ID",
                    "INTAKE_COHORT_B_KEYWORDS",
                )?,
            ],
        };

        let payments = PaymentCatalog {
            upfront: required(
                args.payment_upfront_option_id,
                "INTAKE_PAYMENT_UPFRONT_OPTION_ID",
            )?,
            installments: required(
                args.payment_installments_option_id,
                "INTAKE_PAYMENT_INSTALLMENTS_OPTION_ID",
            )?,
            financing: required(
                args.payment_financing_option_id,
                "INTAKE_PAYMENT_FINANCING_OPTION_ID",
            )?,
        };

        Ok(Self {
            server: ServerSettings {
                addr: SocketAddr::new(args.bind_addr, args.port),
                request_deadline: Duration::from_secs(args.request_deadline_secs),
                max_video_bytes: args.max_video_bytes,
                log_level: args.log_level,
                log_format: args.log_format,
            },
            tracker,
            fields,
            cohorts,
            payments,
        })
    }

    /// Whether the listener is bound to a loopback address only.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        match self.server.addr.ip() {
            IpAddr::V4(ip) => ip.is_loopback(),
            IpAddr::V6(ip) => ip.is_loopback(),
        }
    }
}

fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidSetting {
        name: "INTAKE_TRACKER_BASE_URL",
        value: raw.to_string(),
        reason: "not_a_url",
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidSetting {
            name: "INTAKE_TRACKER_BASE_URL",
            value: raw.to_string(),
            reason: "unsupported_scheme",
        });
    }
    Ok(url)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> ConfigResult<String> {
    optional(value).ok_or(ConfigError::MissingSetting { name })
}

fn cohort_option(
    label: String,
    keywords: Vec<String>,
    option_id: Option<String>,
    option_name: &'static str,
    keywords_name: &'static str,
) -> ConfigResult<CohortOption> {
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ConfigError::MissingSetting {
            name: keywords_name,
        });
    }
    Ok(CohortOption {
        label: label.trim().to_string(),
        keywords,
        option_id: required(option_id, option_name)?,
    })
}
