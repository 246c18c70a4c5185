//! Sample questions and supported intents, for help screens.

use serde::Serialize;

use crate::domain::intent::Intent;

pub const SAMPLE_QUESTIONS: &[&str] = &[
    "¿Cuántos productos hay en el inventario?",
    "Dame productos de suplementos",
    "¿Cuál es el producto más caro?",
    "¿Cuál es el producto más barato?",
    "¿Qué categorías tengo disponibles?",
    "Productos entre 10000 y 50000",
    "Estadísticas del inventario",
    "¿Cuál es el promedio del inventario?",
    "Busca vitaminas",
    "¿Cuántos productos de proteínas hay?",
];

#[derive(Debug, Clone, Serialize)]
pub struct IntentHelp {
    pub intent: Intent,
    pub descripcion: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryCatalog {
    pub ejemplos: Vec<&'static str>,
    pub intenciones_soportadas: Vec<IntentHelp>,
}

fn describe(intent: Intent) -> &'static str {
    match intent {
        Intent::Count => "Contar productos totales o por categoría",
        Intent::Search => "Buscar productos por nombre o categoría",
        Intent::Price => "Consultar precios (más caro, más barato, rangos)",
        Intent::Categories => "Listar categorías disponibles",
        Intent::Statistics => "Obtener estadísticas del inventario",
        Intent::Filter => "Filtrar productos por rango de precios",
    }
}

pub fn catalog() -> QueryCatalog {
    QueryCatalog {
        ejemplos: SAMPLE_QUESTIONS.to_vec(),
        intenciones_soportadas: Intent::ALL
            .iter()
            .map(|&intent| IntentHelp {
                intent,
                descripcion: describe(intent),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::intent_classifier::IntentClassifier;

    #[test]
    fn test_catalog_lists_every_intent() {
        let catalog = catalog();
        assert_eq!(catalog.ejemplos.len(), SAMPLE_QUESTIONS.len());
        assert_eq!(catalog.intenciones_soportadas.len(), Intent::ALL.len());

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["intenciones_soportadas"][5]["intent"], "filter");
    }

    #[test]
    fn test_sample_questions_route_as_advertised() {
        let classifier = IntentClassifier::default();
        let expected = [
            Intent::Count,
            Intent::Search,
            Intent::Price,
            Intent::Price,
            Intent::Categories,
            Intent::Filter,
            Intent::Statistics,
            Intent::Statistics,
            Intent::Search,
            Intent::Count,
        ];
        assert_eq!(expected.len(), SAMPLE_QUESTIONS.len());
        for (question, intent) in SAMPLE_QUESTIONS.iter().zip(expected) {
            assert_eq!(classifier.classify(question), intent, "{}", question);
        }
    }
}
