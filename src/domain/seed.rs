use once_cell::sync::Lazy;

use crate::entities::project::{
    LinkType, LocalizedContent, ProjectContent, ProjectLink, ProjectRecord, ProjectStatus,
    TechnicalDecision,
};

pub const SEED_PROJECT_SLUG: &str = "novann";

const TECH_STACK: [&str; 10] = [
    "Python 3.14", "NumPy", "Pandas", "Pyarrow", "Pyyaml", "Scikit-learn", "Matplotlib",
    "PyTest", "Poetry", "Git",
];

const DESCRIPTION_EN: &str = r#"**NovaNN** is a Deep Learning framework developed from scratch in Python, designed to build, train, and evaluate neural networks in a modular, clear, and extensible way.

The main goal of NovaNN is not to compete with industrial frameworks, but to **understand, implement, and demonstrate** how modern frameworks like PyTorch or TensorFlow work internally, with special emphasis on PyTorch's architecture, which served as the main inspiration.

## Project Philosophy

NovaNN was born with a clear idea:

> *Don't use the magic of existing frameworks—build it*

Every component of the framework is designed to be **readable, traceable, and testable**, prioritizing deep understanding of:

- How computational graphs are built
- How gradients flow during backward pass
- How scalable ML frameworks are structured
- How clean and extensible APIs are designed

## Architecture Overview

NovaNN allows defining complete neural models, managing training, and performing automatic backpropagation through a **dynamic autograd engine**, all built explicitly without depending on external compute engines.

### Implemented Components

- **Layers**: Linear, Conv, MaxPool, AvgPoold, Dropout, BatchNorm, LayerNorm
- **Optimizers**: SGD, Adam, AdamW, RMSprop with momentum support
- **Schedulers**: StepLR, CosineAnnealing, OneCycleLR
- **Loss Functions**: MSE, CrossEntropy, BCE with gradient computation
- **Serialization**: Complete save/load system for checkpoints

## Technical Highlights

- **Version**: 4.0.3
- **Test Coverage**: ~87%
- **Commits**: +700 organized with semantic versioning
- **Operations**: +80 mathematical operations implemented with dynamic binding system"#;

const DESCRIPTION_ES: &str = r#"**NovaNN** es un framework de Deep Learning desarrollado desde cero en Python, diseñado para construir, entrenar y evaluar redes neuronales de forma modular, clara y extensible.

El objetivo principal de NovaNN no es competir con frameworks industriales, sino **entender, implementar y demostrar** cómo funcionan internamente frameworks modernos como PyTorch o TensorFlow, poniendo especial énfasis en la arquitectura de PyTorch, que sirvió como inspiración principal.

## Filosofía del Proyecto

NovaNN nace con una idea clara:

> *No usar la magia de los frameworks existentes, sino construirla*

Cada componente del framework está diseñado para ser **legible, trazable y testeable**, priorizando la comprensión profunda de:

- Cómo se construyen los grafos computacionales
- Cómo fluye el gradiente durante el backward
- Cómo se estructuran frameworks escalables de ML
- Cómo se diseñan APIs limpias y extensibles

## Visión General de la Arquitectura

NovaNN permite definir modelos neuronales completos, gestionar el entrenamiento y realizar backpropagation automático mediante un **motor de autograd dinámico**, todo construido explícitamente y sin depender de motores de cómputo externos.

### Componentes Implementados

- **Capas**: Linear, Conv, MaxPool, AvgPoold, Dropout, BatchNorm, LayerNorm
- **Optimizadores**: SGD, Adam, AdamW, RMSprop con soporte de momentum
- **Schedulers**: StepLR, CosineAnnealing, OneCycleLR
- **Funciones de Pérdida**: MSE, CrossEntropy, BCE con cálculo de gradientes
- **Serialización**: Sistema completo de save/load para checkpoints

## Aspectos Técnicos Destacados

- **Versión**: 4.0.3
- **Cobertura de Tests**: ~87%
- **Commits**: +700 organizados con versionado semántico
- **Operaciones**: +80 operaciones matemáticas implementadas con binding dinámico"#;

static SEED_PROJECT: Lazy<ProjectRecord> = Lazy::new(|| ProjectRecord {
    id: "1".to_string(),
    slug: SEED_PROJECT_SLUG.to_string(),
    featured: true,
    status: ProjectStatus::Active,
    created_at: "Oct 2025".to_string(),
    content: LocalizedContent {
        en: ProjectContent {
            title: "NovaNN".to_string(),
            summary: "A Deep Learning framework built from scratch in Python, designed to understand how modern frameworks like PyTorch work internally.".to_string(),
            description: DESCRIPTION_EN.to_string(),
            tech_stack: tech_stack(),
            decisions: decisions(&[
                ("DFS Computational Graphs (PyTorch-style)", "Implemented a dynamic autograd engine with DFS-based computational graphs, allowing automatic gradient tracking and backpropagation without external engines."),
                ("Dynamic Binding System", "Operations registered via decorators + YAML file, with dynamic binding injecting +60 operations into the Tensor class at module initialization."),
                ("Pure NumPy Backend", "Prioritized understanding over performance. NumPy allows step-by-step debugging and explicit control over all mathematical operations."),
                ("PyTorch-Compatible API", "Designed the API to be familiar to PyTorch users, reducing the learning curve and enabling knowledge transfer between frameworks."),
            ]),
            learnings: strings(&[
                "Gradient clipping is essential for deep networks—I learned this the hard way after exploding gradients crashed my experiments.",
                "Batch normalization dramatically improves training stability. Understanding why requires tracing gradients through the layer.",
                "Weight initialization matters more than expected. Xavier/He initialization prevents saturation in deep networks.",
                "Graph cleanup during backward pass reduced computational cost significantly in complex architectures.",
                "Building from scratch exposed every \"magic\" abstraction—there is no magic, just well-organized math.",
            ]),
            links: links("Documentation"),
        },
        es: ProjectContent {
            title: "NovaNN".to_string(),
            summary: "Un framework de Deep Learning construido desde cero en Python, diseñado para entender cómo funcionan internamente frameworks modernos como PyTorch.".to_string(),
            description: DESCRIPTION_ES.to_string(),
            tech_stack: tech_stack(),
            decisions: decisions(&[
                ("Grafos Computacionales DFS (estilo PyTorch)", "Implementé un motor de autograd dinámico con grafos computacionales basados en DFS, permitiendo seguimiento automático de gradientes y backpropagation sin motores externos."),
                ("Sistema de Binding Dinámico", "Operaciones registradas mediante decoradores + archivo YAML, con binding dinámico que inyecta +60 operaciones en la clase Tensor al inicializar el módulo."),
                ("Backend NumPy Puro", "Prioricé la comprensión sobre el rendimiento. NumPy permite depuración paso a paso y control explícito sobre todas las operaciones matemáticas."),
                ("API Compatible con PyTorch", "Diseñé la API para ser familiar a usuarios de PyTorch, reduciendo la curva de aprendizaje y permitiendo transferencia de conocimiento entre frameworks."),
            ]),
            learnings: strings(&[
                "El gradient clipping es esencial para redes profundas—aprendí esto por las malas cuando gradientes explosivos crashearon mis experimentos.",
                "La normalización por lotes mejora dramáticamente la estabilidad del entrenamiento. Entender por qué requiere trazar gradientes a través de la capa.",
                "La inicialización de pesos importa más de lo esperado. La inicialización Xavier/He previene la saturación en redes profundas.",
                "La limpieza de grafos durante el backward redujo significativamente el coste computacional en arquitecturas complejas.",
                "Construir desde cero expuso cada abstracción \"mágica\"—no hay magia, solo matemáticas bien organizadas.",
            ]),
            links: links("Documentación"),
        },
    },
});

/// The catalog written to an empty store: the owner's flagship project.
pub fn seed_catalog() -> Vec<ProjectRecord> {
    vec![SEED_PROJECT.clone()]
}

fn tech_stack() -> Vec<String> {
    strings(&TECH_STACK)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn decisions(items: &[(&str, &str)]) -> Vec<TechnicalDecision> {
    items.iter()
        .map(|(title, rationale)| TechnicalDecision {
            title: title.to_string(),
            rationale: rationale.to_string(),
        })
        .collect()
}

fn links(docs_label: &str) -> Vec<ProjectLink> {
    vec![
        ProjectLink {
            label: "GitHub".to_string(),
            url: "https://github.com/JOSE-MDG/NovaNN".to_string(),
            link_type: LinkType::Github,
        },
        ProjectLink {
            label: "PyPI".to_string(),
            url: "https://pypi.org/project/novann/".to_string(),
            link_type: LinkType::Pypi,
        },
        ProjectLink {
            label: docs_label.to_string(),
            url: "https://github.com/JOSE-MDG/NovaNN#readme".to_string(),
            link_type: LinkType::Docs,
        },
    ]
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn seed_is_a_single_valid_featured_record() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].slug, SEED_PROJECT_SLUG);
        assert!(catalog[0].featured);
        assert!(catalog[0].validate().is_ok());
    }
}
