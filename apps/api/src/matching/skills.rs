//! Skill Extractor — fixed regex dictionary mapped onto canonical skill names.
//!
//! Recall is bounded by the pattern table. Both resume and job text go
//! through the same table, so the two sides always agree on spelling.

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// (canonical name, case-insensitive pattern)
const SKILL_PATTERNS: &[(&str, &str)] = &[
    // Languages
    ("Python", r"\bpython\b"),
    ("Java", r"\bjava\b"),
    ("JavaScript", r"\bjavascript\b|(?:^|[^.\w])js\b"),
    ("TypeScript", r"\btypescript\b"),
    // Bare "Go" only in its proper-noun spelling; lower-case "go" is a verb.
    ("Go", r"\bgolang\b|(?-i:\bGo\b)"),
    ("Rust", r"\brust\b"),
    ("C++", r"\bc\+\+"),
    ("C#", r"\bc#"),
    ("Ruby", r"\bruby\b"),
    ("PHP", r"\bphp\b"),
    ("Swift", r"\bswift\b"),
    ("Kotlin", r"\bkotlin\b"),
    ("Scala", r"\bscala\b"),
    ("SQL", r"\bsql\b"),
    ("HTML", r"\bhtml5?\b"),
    ("CSS", r"\bcss3?\b"),
    ("Bash", r"\bbash\b"),
    // Frameworks and libraries
    ("React", r"\breact(?:\.?js)?\b"),
    ("Angular", r"\bangular(?:js)?\b"),
    ("Vue", r"\bvue(?:\.?js)?\b"),
    ("Node.js", r"\bnode(?:\.?js)?\b"),
    ("Django", r"\bdjango\b"),
    ("Flask", r"\bflask\b"),
    ("FastAPI", r"\bfastapi\b"),
    ("Spring Boot", r"\bspring\s?boot\b"),
    (".NET", r"\.net\b|\bdotnet\b"),
    ("TensorFlow", r"\btensorflow\b"),
    ("PyTorch", r"\bpytorch\b"),
    ("Scikit-Learn", r"\bscikit-learn\b|\bsklearn\b"),
    ("Pandas", r"\bpandas\b"),
    ("NumPy", r"\bnumpy\b"),
    ("GraphQL", r"\bgraphql\b"),
    // Cloud and devops
    ("AWS", r"\baws\b|\bamazon web services\b"),
    ("Azure", r"\bazure\b"),
    ("GCP", r"\bgcp\b|\bgoogle cloud\b"),
    ("Docker", r"\bdocker\b"),
    ("Kubernetes", r"\bkubernetes\b|\bk8s\b"),
    ("Terraform", r"\bterraform\b"),
    ("Ansible", r"\bansible\b"),
    ("Jenkins", r"\bjenkins\b"),
    ("Git", r"\bgit\b"),
    ("GitHub", r"\bgithub\b"),
    ("GitLab", r"\bgitlab\b"),
    ("CI/CD", r"\bci\s*/\s*cd\b|\bcicd\b"),
    ("Linux", r"\blinux\b"),
    ("DevOps", r"\bdevops\b"),
    ("Microservices", r"\bmicro-?services\b"),
    ("REST", r"\brest(?:ful)?\s+apis?\b"),
    // Databases
    ("PostgreSQL", r"\bpostgres(?:ql)?\b"),
    ("MySQL", r"\bmysql\b"),
    ("MongoDB", r"\bmongo(?:db)?\b"),
    ("Redis", r"\bredis\b"),
    ("NoSQL", r"\bnosql\b"),
    ("Snowflake", r"\bsnowflake\b"),
    ("Elasticsearch", r"\belasticsearch\b"),
    ("DynamoDB", r"\bdynamodb\b"),
    // Data and ML
    ("Machine Learning", r"\bmachine learning\b|\bml\b"),
    ("Deep Learning", r"\bdeep learning\b"),
    ("AI", r"\bai\b|\bartificial intelligence\b"),
    ("NLP", r"\bnlp\b|\bnatural language processing\b"),
    ("Data Science", r"\bdata science\b"),
    ("Data Engineering", r"\bdata engineering\b"),
    ("ETL", r"\betl\b"),
    ("ELT", r"\belt\b"),
    ("DBT", r"\bdbt\b"),
    ("Airflow", r"\bairflow\b"),
    ("Spark", r"\b(?:py)?spark\b"),
    ("Hadoop", r"\bhadoop\b"),
    ("Kafka", r"\bkafka\b"),
    ("Tableau", r"\btableau\b"),
    ("Power BI", r"\bpower\s?bi\b"),
    ("Excel", r"\bexcel\b"),
    // Methodologies
    ("Agile", r"\bagile\b"),
    ("Scrum", r"\bscrum\b"),
    ("Kanban", r"\bkanban\b"),
    ("TDD", r"\btdd\b|\btest[- ]driven development\b"),
];

/// Alternate spellings that must compare equal to a canonical skill.
const SKILL_SYNONYMS: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("ecmascript", "JavaScript"),
    ("ts", "TypeScript"),
    ("golang", "Go"),
    ("k8s", "Kubernetes"),
    ("postgres", "PostgreSQL"),
    ("psql", "PostgreSQL"),
    ("mongo", "MongoDB"),
    ("reactjs", "React"),
    ("react.js", "React"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("vuejs", "Vue"),
    ("vue.js", "Vue"),
    ("angularjs", "Angular"),
    ("ml", "Machine Learning"),
    ("artificial intelligence", "AI"),
    ("natural language processing", "NLP"),
    ("amazon web services", "AWS"),
    ("google cloud", "GCP"),
    ("google cloud platform", "GCP"),
    ("microsoft azure", "Azure"),
    ("powerbi", "Power BI"),
    ("sklearn", "Scikit-Learn"),
    ("cicd", "CI/CD"),
    ("ci-cd", "CI/CD"),
    ("pyspark", "Spark"),
    ("apache spark", "Spark"),
    ("apache kafka", "Kafka"),
    ("dotnet", ".NET"),
    ("cpp", "C++"),
    ("csharp", "C#"),
    ("springboot", "Spring Boot"),
    ("microservice", "Microservices"),
    ("restful", "REST"),
    ("rest api", "REST"),
];

/// Words upper-cased when canonicalizing an unknown skill.
const ACRONYMS: &[&str] = &[
    "ai", "api", "aws", "bi", "cd", "ci", "css", "dbt", "elt", "etl", "gcp", "html", "ios",
    "json", "llm", "ml", "nlp", "php", "qa", "rest", "sas", "sql", "ui", "ux", "xml",
];

static COMPILED_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_PATTERNS
        .iter()
        .map(|(canonical, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}")).unwrap();
            (*canonical, regex)
        })
        .collect()
});

static CANONICAL_BY_ALIAS: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map: HashMap<String, &'static str> = SKILL_PATTERNS
        .iter()
        .map(|(canonical, _)| (canonical.to_lowercase(), *canonical))
        .collect();
    for (alias, canonical) in SKILL_SYNONYMS {
        map.insert(alias.to_string(), canonical);
    }
    map
});

/// Lower-cased words that belong to some known skill name.
pub static SKILL_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    CANONICAL_BY_ALIAS
        .keys()
        .flat_map(|alias| alias.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
});

/// Runs the pattern table over `text` and returns the canonical skills found,
/// ordered by name.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    COMPILED_PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(canonical, _)| canonical.to_string())
        .collect()
}

/// Maps a free-form skill label to its canonical spelling.
///
/// Known skills and synonyms resolve through the table; anything else gets
/// acronym-aware title casing (`power bi` → `Power BI`).
pub fn canonicalize_skill(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();
    if let Some(canonical) = CANONICAL_BY_ALIAS.get(&lowered) {
        return canonical.to_string();
    }

    lowered
        .split(' ')
        .map(|word| {
            if ACRONYMS.contains(&word) {
                word.to_uppercase()
            } else {
                title_case(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key: synonym-equivalent skills share one key.
pub fn skill_key(skill: &str) -> String {
    canonicalize_skill(skill).to_lowercase()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
