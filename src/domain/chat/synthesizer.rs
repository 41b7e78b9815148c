//! Rule-based reply synthesizer.
//!
//! Used only when the remote model is unavailable. Replies are produced by an
//! ordered table of (predicate, handler) buckets; the first bucket whose
//! predicate matches answers, so a message mentioning both a price and a
//! claim always gets the pricing reply.

use rand::seq::SliceRandom;

use crate::domain::catalog::InsuranceCategory;

use super::fields::IntakeFields;
use super::money::format_inr;
use super::session::{Turn, TurnRole};

const DEFAULT_NAME: &str = "there";

/// Reply categories, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyBucket {
    Pricing,
    Coverage,
    Claims,
    Comparison,
    Timeline,
    Documents,
    CategorySpecific,
    Generic,
}

const PRICING_TERMS: &[&str] = &[
    "quote", "quotes", "price", "prices", "pricing", "cost", "costs", "premium", "premiums",
    "rate", "rates", "cheap", "cheapest", "afford", "affordable", "budget", "how much",
];
const COVERAGE_TERMS: &[&str] = &[
    "coverage", "cover", "covers", "covered", "protection", "protect", "benefit", "benefits",
    "include", "includes", "sum insured",
];
const CLAIMS_TERMS: &[&str] = &[
    "claim", "claims", "accident", "damage", "incident", "hospitalization", "hospitalisation",
    "settlement", "cashless",
];
const COMPARISON_TERMS: &[&str] = &[
    "compare", "comparison", "better", "best", "difference", "vs", "versus", "which one",
];
const TIMELINE_TERMS: &[&str] = &[
    "how long", "when", "timeline", "days", "weeks", "quickly", "soon", "immediately",
    "waiting period", "activate", "start",
];
const DOCUMENT_TERMS: &[&str] = &[
    "document", "documents", "documentation", "paperwork", "papers", "requirement",
    "requirements", "required", "kyc", "proof", "medical test", "medical tests",
];

const HEALTH_FAMILY_TERMS: &[&str] = &[
    "family", "floater", "spouse", "wife", "husband", "children", "kids", "parents",
];
const HEALTH_INDIVIDUAL_TERMS: &[&str] = &["individual", "myself", "just me", "single", "alone"];
const HEALTH_CONDITION_TERMS: &[&str] = &[
    "pre-existing", "preexisting", "pre existing", "diabetes", "blood pressure", "bp",
    "condition", "conditions", "asthma", "thyroid",
];
const LIFE_DEPENDENT_TERMS: &[&str] = &[
    "family", "dependents", "dependants", "wife", "husband", "children", "kids", "parents",
];
const LIFE_TENURE_TERMS: &[&str] = &["tenure", "years", "retire", "retirement", "until"];
const AUTO_NEW_TERMS: &[&str] = &["new car", "new bike", "new vehicle", "brand new", "showroom"];
const AUTO_USED_TERMS: &[&str] = &[
    "used", "second hand", "second-hand", "pre-owned", "old car", "old bike",
];
const HOME_RENTER_TERMS: &[&str] = &["rent", "rented", "renting", "tenant", "landlord"];
const HOME_OWNER_TERMS: &[&str] = &["own", "owner", "mortgage", "home loan", "bought"];
const INVESTMENT_GOAL_TERMS: &[&str] = &[
    "retirement", "education", "goal", "goals", "returns", "wealth", "maturity",
];

/// Inputs for the greeting template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GreetingInput {
    pub name: Option<String>,
    pub category: Option<InsuranceCategory>,
    pub location: Option<String>,
}

impl GreetingInput {
    /// Extracts greeting inputs from a session context.
    pub fn from_context(context: &IntakeFields) -> Self {
        Self {
            name: context.name(),
            category: context.insurance_category(),
            location: context.location(),
        }
    }
}

/// Inputs for a per-turn reply.
#[derive(Debug, Clone, Copy)]
pub struct ReplyInput<'a> {
    pub message: &'a str,
    pub context: &'a IntakeFields,
    pub history: &'a [Turn],
}

/// Returns the per-category welcome message. Deterministic.
pub fn greeting(input: &GreetingInput) -> String {
    let name = input.name.as_deref().unwrap_or(DEFAULT_NAME);
    let area = match input.location.as_deref() {
        Some(location) => format!("around {}", location),
        None => "in your area".to_string(),
    };

    match input.category {
        Some(InsuranceCategory::Auto) => format!(
            "Hello {name}! I'm here to help you find the right auto insurance. I've lined up \
             policies available {area} so we can protect your vehicle without overpaying."
        ),
        Some(InsuranceCategory::Health) => format!(
            "Hello {name}! I'm your health insurance guide. I've looked at plans available {area} \
             - let's find the right coverage for your healthcare needs."
        ),
        Some(InsuranceCategory::TermLife) => format!(
            "Hi {name}! I'm your term life insurance advisor. I'll help you choose cover that \
             protects your family's financial future, with plans available {area}."
        ),
        Some(InsuranceCategory::Home) => format!(
            "Welcome {name}! I'm here to help you protect your home and belongings. I've found \
             home insurance options available {area}."
        ),
        Some(InsuranceCategory::Investment) => format!(
            "Hi {name}! I'm here to help you explore plans that grow your savings while keeping \
             you protected. I've checked what's available {area}."
        ),
        Some(InsuranceCategory::Other(_)) | None => format!(
            "Hello {name}! I'm here to help you with your insurance needs. I've checked what's \
             available {area} - tell me what you'd like to protect."
        ),
    }
}

/// Returns the rule-based reply for a user message.
pub fn reply(input: &ReplyInput<'_>) -> String {
    let message = NormalizedMessage::new(input.message);
    let facts = ReplyFacts::new(input.context, input.history);

    match BUCKETS
        .iter()
        .find(|bucket| (bucket.matches)(&message, &facts))
    {
        Some(bucket) => (bucket.respond)(&message, &facts),
        None => generic_reply(&facts),
    }
}

/// Returns which bucket would answer `message`.
pub fn classify(message: &str, context: &IntakeFields) -> ReplyBucket {
    let message = NormalizedMessage::new(message);
    let facts = ReplyFacts::new(context, &[]);
    BUCKETS
        .iter()
        .find(|bucket| (bucket.matches)(&message, &facts))
        .map(|bucket| bucket.kind)
        .unwrap_or(ReplyBucket::Generic)
}

/// Sentences the generic catch-all draws from.
pub fn generic_pool(name: &str, topic: &str) -> Vec<String> {
    vec![
        format!(
            "Thanks for your message, {name}! I can walk you through {topic} plans, prices, \
             claims or paperwork. What would you like to know?"
        ),
        format!(
            "Happy to help, {name}. Ask me about {topic} premiums, what's covered, or how claims \
             work, and I'll point you in the right direction."
        ),
        format!(
            "Got it, {name}. Could you tell me a little more about what you're looking for in \
             {topic} insurance? I can compare plans, explain coverage or share prices."
        ),
        format!(
            "I'm here for you, {name}. Whether it's {topic} coverage, costs or the claims process, \
             just let me know where you'd like to start."
        ),
    ]
}

struct Bucket {
    kind: ReplyBucket,
    matches: fn(&NormalizedMessage, &ReplyFacts) -> bool,
    respond: fn(&NormalizedMessage, &ReplyFacts) -> String,
}

const BUCKETS: &[Bucket] = &[
    Bucket {
        kind: ReplyBucket::Pricing,
        matches: |m, _| m.has_any(PRICING_TERMS),
        respond: |_, f| pricing_reply(f),
    },
    Bucket {
        kind: ReplyBucket::Coverage,
        matches: |m, _| m.has_any(COVERAGE_TERMS),
        respond: |_, f| coverage_reply(f),
    },
    Bucket {
        kind: ReplyBucket::Claims,
        matches: |m, _| m.has_any(CLAIMS_TERMS),
        respond: |_, f| claims_reply(f),
    },
    Bucket {
        kind: ReplyBucket::Comparison,
        matches: |m, _| m.has_any(COMPARISON_TERMS),
        respond: |_, f| comparison_reply(f),
    },
    Bucket {
        kind: ReplyBucket::Timeline,
        matches: |m, _| m.has_any(TIMELINE_TERMS),
        respond: |_, f| timeline_reply(f),
    },
    Bucket {
        kind: ReplyBucket::Documents,
        matches: |m, _| m.has_any(DOCUMENT_TERMS),
        respond: |_, f| documents_reply(f),
    },
    Bucket {
        kind: ReplyBucket::CategorySpecific,
        matches: |m, f| category_topic(m, f).is_some(),
        respond: |m, f| match category_topic(m, f) {
            Some(topic) => category_reply(topic, f),
            None => generic_reply(f),
        },
    },
];

/// Lower-cased message with a word index for keyword lookup.
struct NormalizedMessage {
    padded: String,
    words: Vec<String>,
}

impl NormalizedMessage {
    fn new(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let words: Vec<String> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
            .map(|w| w.trim_matches(|c| c == '-' || c == '\''))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let padded = format!(" {} ", words.join(" "));
        Self { padded, words }
    }

    /// Single-word keywords match the start of a word, so inflections hit;
    /// phrases match word sequences.
    fn has(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.padded.contains(&format!(" {} ", keyword))
        } else {
            self.words.iter().any(|w| w.starts_with(keyword))
        }
    }

    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has(k))
    }
}

/// Context facts the templates interpolate.
struct ReplyFacts {
    name: String,
    category: Option<InsuranceCategory>,
    age: Option<u32>,
    coverage: Option<f64>,
    vehicle: Option<String>,
    prior_user_turns: usize,
}

impl ReplyFacts {
    fn new(context: &IntakeFields, history: &[Turn]) -> Self {
        Self {
            name: context.name().unwrap_or_else(|| DEFAULT_NAME.to_string()),
            category: context.insurance_category(),
            age: context.age(),
            coverage: context.coverage_amount(),
            vehicle: context.probe_text(&["vehicleModel", "vehicle_model", "carModel"]),
            prior_user_turns: history
                .iter()
                .filter(|turn| turn.role == TurnRole::User)
                .count(),
        }
    }

    fn topic(&self) -> &str {
        self.category
            .as_ref()
            .map(InsuranceCategory::label)
            .unwrap_or("your")
    }
}

/// Indicative annual premium floor per category.
fn starting_premium(category: Option<&InsuranceCategory>) -> f64 {
    match category {
        Some(InsuranceCategory::Auto) => 2_500.0,
        Some(InsuranceCategory::Health) => 8_000.0,
        Some(InsuranceCategory::TermLife) => 9_000.0,
        Some(InsuranceCategory::Home) => 1_500.0,
        Some(InsuranceCategory::Investment) => 24_000.0,
        Some(InsuranceCategory::Other(_)) | None => 5_000.0,
    }
}

fn pricing_reply(f: &ReplyFacts) -> String {
    let from = format_inr(starting_premium(f.category.as_ref()));
    match f.category {
        Some(InsuranceCategory::Auto) => {
            let vehicle = f.vehicle.as_deref().unwrap_or("your vehicle");
            format!(
                "Good question, {}! Comprehensive cover for {} usually starts from about {} \
                 a year, depending on the model, city and your no-claim bonus. I can have a \
                 specialist share an exact quote.",
                f.name, vehicle, from
            )
        }
        Some(InsuranceCategory::TermLife) => {
            let cover = format_inr(f.coverage.unwrap_or(10_000_000.0));
            let age = f
                .age
                .map(|a| format!("at age {}", a))
                .unwrap_or_else(|| "for your age group".to_string());
            format!(
                "{}, a term plan with {} of cover {} typically costs from {} a year. Premiums are \
                 locked in when you buy, so starting early keeps them low.",
                f.name, cover, age, from
            )
        }
        _ => match f.coverage {
            Some(cover) => format!(
                "{}, for {} of {} cover, premiums typically start around {} a year. I can fetch \
                 personalised quotes from our partner insurers.",
                f.name,
                format_inr(cover),
                f.topic(),
                from
            ),
            None => format!(
                "{}, {} insurance premiums typically start around {} a year. I can fetch \
                 personalised quotes based on the details you've shared.",
                f.name,
                f.topic(),
                from
            ),
        },
    }
}

fn coverage_reply(f: &ReplyFacts) -> String {
    match f.category {
        Some(InsuranceCategory::Auto) => format!(
            "{}, our auto policies cover own damage, third-party liability and personal accident, \
             with add-ons like zero depreciation, roadside assistance and engine protection. Which \
             of these matters most to you?",
            f.name
        ),
        Some(InsuranceCategory::Health) => format!(
            "{}, health plans cover hospitalisation, pre- and post-hospitalisation expenses, \
             day-care procedures and ambulance charges, with sums insured from {} to {}. How much \
             cover are you considering?",
            f.name,
            format_inr(300_000.0),
            format_inr(10_000_000.0)
        ),
        Some(InsuranceCategory::TermLife) => format!(
            "{}, term life insurance pays a lump sum to your family if something happens to you \
             during the policy term. Cover typically ranges from {} to {}. How much do you think \
             your family would need?",
            f.name,
            format_inr(2_500_000.0),
            format_inr(50_000_000.0)
        ),
        Some(InsuranceCategory::Home) => format!(
            "{}, home insurance protects the structure and your belongings against fire, theft, \
             floods and other natural disasters. Would you like to cover the building, the \
             contents, or both?",
            f.name
        ),
        _ => format!(
            "{}, our {} insurance plans offer protection tailored to your needs. I can explain the \
             specific benefits and options available to you.",
            f.name,
            f.topic()
        ),
    }
}

fn claims_reply(f: &ReplyFacts) -> String {
    format!(
        "{}, our claims process is designed to be simple: you can report a claim 24/7, most \
         claims are settled within 48 hours, and you can upload photos and bills from your phone. \
         Is there a recent incident you need help with?",
        f.name
    )
}

fn comparison_reply(f: &ReplyFacts) -> String {
    format!(
        "Happy to compare options, {}. I usually look at premium, coverage limits, claim \
         settlement ratio and exclusions side by side. Which matters most for your {} plan - \
         price, coverage or service?",
        f.name,
        f.topic()
    )
}

fn timeline_reply(f: &ReplyFacts) -> String {
    let detail = match f.category {
        Some(InsuranceCategory::Health) => {
            " Note that health plans have an initial 30-day waiting period for illnesses, \
             and longer ones for pre-existing conditions."
        }
        Some(InsuranceCategory::TermLife) => {
            " Term plans may need a quick medical check before the policy is issued."
        }
        Some(InsuranceCategory::Auto) => " Auto cover can usually start the same day.",
        _ => "",
    };
    format!(
        "{}, most policies can be issued within 24 to 48 hours once we have your details and \
         payment.{}",
        f.name, detail
    )
}

fn documents_reply(f: &ReplyFacts) -> String {
    let specific = match f.category {
        Some(InsuranceCategory::Auto) => {
            "your vehicle registration certificate and previous policy"
        }
        Some(InsuranceCategory::Health) => "any recent medical reports",
        Some(InsuranceCategory::TermLife) => "income proof, and possibly a medical test",
        Some(InsuranceCategory::Home) => "proof of ownership or your rental agreement",
        _ => "a few details about what you want to insure",
    };
    format!(
        "{}, you'll typically need an ID proof, address proof and {}. Everything can be uploaded \
         online, so there's no paperwork to post.",
        f.name, specific
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoryTopic {
    HealthFamily,
    HealthIndividual,
    HealthPreExisting,
    LifeDependents,
    LifeTenure,
    AutoNew,
    AutoUsed,
    HomeRenter,
    HomeOwner,
    InvestmentGoal,
}

fn category_topic(m: &NormalizedMessage, f: &ReplyFacts) -> Option<CategoryTopic> {
    match f.category.as_ref()? {
        InsuranceCategory::Health => {
            if m.has_any(HEALTH_CONDITION_TERMS) {
                Some(CategoryTopic::HealthPreExisting)
            } else if m.has_any(HEALTH_FAMILY_TERMS) {
                Some(CategoryTopic::HealthFamily)
            } else if m.has_any(HEALTH_INDIVIDUAL_TERMS) {
                Some(CategoryTopic::HealthIndividual)
            } else {
                None
            }
        }
        InsuranceCategory::TermLife => {
            if m.has_any(LIFE_DEPENDENT_TERMS) {
                Some(CategoryTopic::LifeDependents)
            } else if m.has_any(LIFE_TENURE_TERMS) {
                Some(CategoryTopic::LifeTenure)
            } else {
                None
            }
        }
        InsuranceCategory::Auto => {
            if m.has_any(AUTO_USED_TERMS) {
                Some(CategoryTopic::AutoUsed)
            } else if m.has_any(AUTO_NEW_TERMS) {
                Some(CategoryTopic::AutoNew)
            } else {
                None
            }
        }
        InsuranceCategory::Home => {
            if m.has_any(HOME_RENTER_TERMS) {
                Some(CategoryTopic::HomeRenter)
            } else if m.has_any(HOME_OWNER_TERMS) {
                Some(CategoryTopic::HomeOwner)
            } else {
                None
            }
        }
        InsuranceCategory::Investment => m
            .has_any(INVESTMENT_GOAL_TERMS)
            .then_some(CategoryTopic::InvestmentGoal),
        InsuranceCategory::Other(_) => None,
    }
}

fn category_reply(topic: CategoryTopic, f: &ReplyFacts) -> String {
    match topic {
        CategoryTopic::HealthFamily => format!(
            "{}, a family floater plan covers everyone under one shared sum insured and usually \
             costs less than separate policies. A {} floater is a good starting point for a \
             family of four.",
            f.name,
            format_inr(1_000_000.0)
        ),
        CategoryTopic::HealthIndividual => format!(
            "{}, an individual plan gives you a dedicated sum insured. For most people a cover of \
             {} to {} is a comfortable range.",
            f.name,
            format_inr(500_000.0),
            format_inr(1_000_000.0)
        ),
        CategoryTopic::HealthPreExisting => format!(
            "Thanks for sharing that, {}. Pre-existing conditions are covered after a waiting \
             period of two to four years, and some plans reduce it for a small extra premium. \
             Please declare them upfront so claims go smoothly.",
            f.name
        ),
        CategoryTopic::LifeDependents => {
            let cover = f.coverage.unwrap_or(10_000_000.0);
            format!(
                "{}, a common rule of thumb is cover of 10 to 15 times your annual income so your \
                 dependents can maintain their lifestyle. {} is a popular starting point.",
                f.name,
                format_inr(cover)
            )
        }
        CategoryTopic::LifeTenure => {
            let until = 60;
            let years = f
                .age
                .filter(|age| *age < until)
                .map(|age| format!(" - that's {} years from now", until - age))
                .unwrap_or_default();
            format!(
                "{}, most people choose a term that runs until their planned retirement, around \
                 age {}{}. Longer terms cost a little more but keep your family protected for \
                 longer.",
                f.name, until, years
            )
        }
        CategoryTopic::AutoNew => format!(
            "Congratulations on the new vehicle, {}! For new vehicles I'd recommend comprehensive \
             cover with zero depreciation for the first few years.",
            f.name
        ),
        CategoryTopic::AutoUsed => format!(
            "{}, for a pre-owned vehicle we'll transfer or start a fresh policy in your name. \
             Comprehensive cover is still worth it, and premiums are lower as the vehicle's value \
             has depreciated.",
            f.name
        ),
        CategoryTopic::HomeRenter => format!(
            "{}, as a tenant you can insure just your contents - furniture, electronics and \
             valuables - without covering the building itself. Contents cover starts from about \
             {} a year.",
            f.name,
            format_inr(starting_premium(Some(&InsuranceCategory::Home)))
        ),
        CategoryTopic::HomeOwner => format!(
            "{}, as an owner you can cover both the structure and your belongings. If you have a \
             home loan, your lender may require structure cover.",
            f.name
        ),
        CategoryTopic::InvestmentGoal => format!(
            "{}, goal-based plans let you invest a fixed amount every month and receive a lump sum \
             at maturity, with life cover built in. Investing {} a month is a common starting \
             point.",
            f.name,
            format_inr(starting_premium(Some(&InsuranceCategory::Investment)) / 12.0)
        ),
    }
}

fn generic_reply(f: &ReplyFacts) -> String {
    let pool = generic_pool(&f.name, f.topic());
    let mut reply = pool
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default();
    if f.prior_user_turns >= 4 {
        reply.push_str(
            " If it's easier, I can also arrange a call with one of our licensed agents.",
        );
    }
    reply
}
