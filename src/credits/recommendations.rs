use super::domain::{CourseCategory, RecommendedCourse};

/// Boundary to whatever supplies the current course listing. The built-in
/// [`StaticCatalog`] is the fallback when no live source is wired in.
pub trait CourseCatalog: Send + Sync {
    fn courses(&self) -> Result<Vec<RecommendedCourse>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("course catalog unavailable: {0}")]
    Unavailable(String),
}

/// Keyword buckets checked in order; cultural wins over core wins over
/// quality/ethics/regulations, and anything unmatched is a professional
/// course.
const CULTURAL_KEYWORDS: [&str; 4] = ["indigenous", "multicultural", "cultural", "ethnic"];
const CORE_KEYWORDS: [&str; 8] = [
    "fire",
    "emergency",
    "infection",
    "gender",
    "cpr",
    "aed",
    "disaster",
    "first aid",
];
const QER_KEYWORDS: [&str; 11] = [
    "ethic",
    "regulation",
    "law",
    "legal",
    "quality",
    "rights",
    "privacy",
    "stress",
    "dispute",
    "workplace",
    "grievance",
];

/// Generic link labels that show up around course listings but are not
/// course titles themselves.
const IGNORED_TITLES: [&str; 6] = ["details", "more", "register", "view", "read more", "sign up"];

pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn looks_like_course_title(title: &str) -> bool {
    let normalized = normalize_title(title).to_lowercase();
    normalized.chars().count() >= 4 && !IGNORED_TITLES.contains(&normalized.as_str())
}

pub fn categorize_title(title: &str) -> CourseCategory {
    let lowered = title.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if matches(&CULTURAL_KEYWORDS) {
        CourseCategory::CulturalNew
    } else if matches(&CORE_KEYWORDS) {
        CourseCategory::Core
    } else if matches(&QER_KEYWORDS) {
        CourseCategory::QualityEthicsRegulations
    } else {
        CourseCategory::Professional
    }
}

/// Curated course list bundled with the service, refreshed by hand when the
/// provider updates their listing.
pub struct StaticCatalog {
    courses: Vec<RecommendedCourse>,
}

const COURSE_BASE_URL: &str = "https://courses.gogocare.example/course";

impl StaticCatalog {
    pub fn standard() -> Self {
        let titles: [(&str, CourseCategory); 20] = [
            (
                "Recognizing Age-Related Hearing Loss",
                CourseCategory::Professional,
            ),
            (
                "First Aid and Acute Symptom Response",
                CourseCategory::Professional,
            ),
            (
                "Care Planning for Independent Living",
                CourseCategory::Professional,
            ),
            (
                "Vital Signs and Condition Assessment",
                CourseCategory::Professional,
            ),
            (
                "Dementia Communication Essentials",
                CourseCategory::Professional,
            ),
            (
                "Safe Medication Support at Home",
                CourseCategory::Professional,
            ),
            ("CPR and AED Refresher", CourseCategory::Professional),
            (
                "Self-Protection and Strain Relief in Care Work",
                CourseCategory::QualityEthicsRegulations,
            ),
            (
                "Stress First Aid for Care Workers",
                CourseCategory::QualityEthicsRegulations,
            ),
            (
                "Long-Term Care Legal Risk Essentials",
                CourseCategory::QualityEthicsRegulations,
            ),
            (
                "Elder Protection and Services",
                CourseCategory::QualityEthicsRegulations,
            ),
            (
                "Ethics of Dementia Care",
                CourseCategory::QualityEthicsRegulations,
            ),
            (
                "Fire Incident Response and Evacuation",
                CourseCategory::Core,
            ),
            ("Household Fire Risk Assessment", CourseCategory::Core),
            ("Home Infection Control Basics", CourseCategory::Core),
            (
                "Carbon Monoxide and Natural Disaster Response",
                CourseCategory::Core,
            ),
            (
                "Gender Mainstreaming and Gender Awareness at Work",
                CourseCategory::Core,
            ),
            (
                "Cultural Safety in Indigenous Long-Term Care",
                CourseCategory::CulturalNew,
            ),
            (
                "Culturally Sensitive Care Topics",
                CourseCategory::CulturalNew,
            ),
            (
                "Indigenous Rights and Multicultural Inclusion",
                CourseCategory::CulturalNew,
            ),
        ];

        let courses = titles
            .iter()
            .enumerate()
            .map(|(index, (name, category))| RecommendedCourse {
                id: index as u32 + 1,
                name: (*name).to_string(),
                url: format!("{COURSE_BASE_URL}/{:04}", index + 1),
                category: *category,
            })
            .collect();

        Self { courses }
    }

    /// Build a catalog from scraped or imported titles, dropping entries
    /// that look like navigation chrome and categorizing the rest by
    /// keyword.
    pub fn from_titles<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let courses = entries
            .into_iter()
            .filter(|(name, _)| looks_like_course_title(name))
            .enumerate()
            .map(|(index, (name, url))| {
                let name = normalize_title(&name);
                let category = categorize_title(&name);
                RecommendedCourse {
                    id: index as u32 + 1,
                    name,
                    url,
                    category,
                }
            })
            .collect();

        Self { courses }
    }
}

impl CourseCatalog for StaticCatalog {
    fn courses(&self) -> Result<Vec<RecommendedCourse>, CatalogError> {
        Ok(self.courses.clone())
    }
}
