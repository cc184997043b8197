use carteira_core::Category;
use serde::Deserialize;

/// One semantic bucket: its name plus the merchant/payment-rail keywords
/// that imply it in Brazilian statement text.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordBucket {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Declaration order matters: the first bucket with a keyword hit wins.
const DEFAULT_TABLE: &[(&str, &[&str])] = &[
    (
        "alimentação",
        &[
            "mercado", "supermercado", "padaria", "acougue", "hortifruti", "restaurante",
            "lanchonete", "ifood", "rappi", "mcdonalds", "burger", "pizzaria",
        ],
    ),
    (
        "transporte",
        &[
            "uber", "99*", "taxi", "posto", "combustivel", "gasolina", "estacionamento",
            "metro", "onibus", "pedagio", "ipva",
        ],
    ),
    (
        "saúde",
        &[
            "farmacia", "drogaria", "drogasil", "hospital", "clinica", "laboratorio",
            "consulta", "unimed", "amil",
        ],
    ),
    (
        "moradia",
        &[
            "aluguel", "condominio", "energia", "enel", "agua", "sabesp", "gas",
            "internet", "vivo", "claro", "tim", "iptu",
        ],
    ),
    (
        "lazer",
        &[
            "cinema", "netflix", "spotify", "steam", "show", "teatro", "hotel", "viagem",
        ],
    ),
    (
        "educação",
        &[
            "escola", "colegio", "faculdade", "universidade", "curso", "livraria",
            "udemy", "alura",
        ],
    ),
    (
        "vestuário",
        &["renner", "riachuelo", "c&a", "zara", "shein", "calcado", "vestuario"],
    ),
    (
        "salário",
        &["salario", "provento", "remuneracao", "folha de pagamento", "pgto"],
    ),
    (
        "transferência",
        &["pix", "ted", "doc", "transferencia", "transf"],
    ),
];

/// Keyword-table classifier mapping a statement description to one of the
/// user's categories. Pure lookup: same inputs, same answer, no state.
pub struct CategorySuggester {
    buckets: Vec<KeywordBucket>,
}

impl CategorySuggester {
    /// Keywords are matched lowercased; normalize here so the table source
    /// doesn't have to care.
    pub fn new(buckets: Vec<KeywordBucket>) -> Self {
        let buckets = buckets
            .into_iter()
            .map(|b| KeywordBucket {
                name: b.name,
                keywords: b.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        CategorySuggester { buckets }
    }

    /// Loads a replacement table, e.g.:
    ///
    /// ```toml
    /// [[buckets]]
    /// name = "alimentação"
    /// keywords = ["mercado", "ifood"]
    /// ```
    pub fn from_toml(toml_content: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize)]
        struct Table {
            buckets: Vec<KeywordBucket>,
        }
        let table: Table = toml::from_str(toml_content)?;
        Ok(Self::new(table.buckets))
    }

    /// Walks the table in declaration order. A bucket is a candidate when any
    /// of its keywords occurs in the lowercased description; it wins when its
    /// name and some user category's name contain one another (either
    /// direction), and that category is returned. No hit anywhere → `None`,
    /// and the caller applies its own fallback bucket.
    pub fn suggest<'a>(&self, description: &str, categories: &'a [Category]) -> Option<&'a Category> {
        let text = description.to_lowercase();

        for bucket in &self.buckets {
            if !bucket.keywords.iter().any(|k| text.contains(k.as_str())) {
                continue;
            }
            let bucket_name = bucket.name.to_lowercase();
            let hit = categories.iter().find(|category| {
                let category_name = category.name.to_lowercase();
                category_name.contains(&bucket_name) || bucket_name.contains(&category_name)
            });
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

impl Default for CategorySuggester {
    fn default() -> Self {
        Self::new(
            DEFAULT_TABLE
                .iter()
                .map(|(name, keywords)| KeywordBucket {
                    name: (*name).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        )
    }
}

/// Built-in-table convenience for the import review screen.
pub fn suggest_category<'a>(description: &str, categories: &'a [Category]) -> Option<&'a Category> {
    CategorySuggester::default().suggest(description, categories)
}
