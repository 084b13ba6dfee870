//! Keyword-candidate mapping from raw header names to canonical fields.

use crate::schema::CanonicalField;

/// Ordered candidate tokens per canonical field: synonyms, abbreviations
/// and accent variants seen across court exports. Immutable configuration
/// data.
pub fn candidates(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::ServerName => &[
            "nome",
            "servidor",
            "nome_servidor",
            "nome do servidor",
            "servidor_nome",
        ],
        CanonicalField::Role => &[
            "cargo",
            "funcao",
            "função",
            "posto",
            "emprego",
            "cargo/funcao",
        ],
        CanonicalField::Career => &["carreira", "grupo", "categoria", "vinculo_carreira"],
        CanonicalField::BondType => &[
            "vinculo",
            "tipo_vinculo",
            "regime",
            "tipo",
            "comissionado",
            "estatutario",
            "estatutário",
        ],
        CanonicalField::GrossPay => &[
            "remuneracao_bruta",
            "remuneração bruta",
            "bruta",
            "total_bruto",
            "valor_bruto",
            "total da remuneração",
            "total remuneracao",
            "remuneracao total",
            "rendimentos",
            "proventos",
            "total de creditos",
            "total de créditos",
        ],
        CanonicalField::BasePay => &[
            "vencimento_basico",
            "vencimento",
            "salario",
            "salário",
            "base",
        ],
        CanonicalField::Benefits => &[
            "beneficios",
            "benefícios",
            "indenizacoes",
            "indenizações",
            "vantagens",
            "gratificacoes",
            "gratificações",
            "adiantamentos",
            "auxilios",
            "auxílios",
        ],
        CanonicalField::Deductions => &[
            "descontos",
            "deducoes",
            "deduções",
            "impostos",
            "retencoes",
            "retenções",
            "total do desconto",
            "total de descontos",
            "total desconto",
        ],
        CanonicalField::NetPay => &[
            "liquido",
            "líquido",
            "remuneracao_liquida",
            "remuneração líquida",
            "total_liquido",
            "rendimento liquido",
            "rendimento líquido",
            "rendimento liquido (xi)",
            "rendimento líquido (xi)",
            "rendimento liquido xi",
            "rendimento líquido xi",
            "liquido do mes",
            "líquido do mês",
            "liquido do mês",
            "liquido mês",
        ],
    }
}

/// Per-file association between canonical fields and source column indices.
/// Recomputed for every file: header vocabulary differs file to file.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    slots: [Option<usize>; CanonicalField::MAPPED.len()],
}

impl ColumnMapping {
    pub fn source_index(&self, field: CanonicalField) -> Option<usize> {
        let slot = CanonicalField::MAPPED
            .iter()
            .position(|f| *f == field)
            .expect("field is in MAPPED");
        self.slots[slot]
    }
}

/// Map raw header names to canonical fields.
///
/// Per field, two passes over the headers in original column order: exact
/// match of the trimmed lower-cased name, then substring containment. A
/// header may satisfy several fields; no exclusivity is enforced — an
/// accepted heuristic limitation, not a bijection guarantee.
pub fn map_columns(columns: &[String]) -> ColumnMapping {
    let normalized: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    let mut mapping = ColumnMapping::default();
    for (slot, field) in CanonicalField::MAPPED.iter().enumerate() {
        let tokens = candidates(*field);

        let exact = normalized
            .iter()
            .position(|name| tokens.contains(&name.as_str()));
        let found = exact.or_else(|| {
            normalized
                .iter()
                .position(|name| tokens.iter().any(|t| name.contains(t)))
        });
        mapping.slots[slot] = found;
    }
    mapping
}
