// plan/detalle.rs
// Payment-plan breakdown as persisted inside a PlanPago document.

use serde::{Deserialize, Serialize};

/// How a line item's `valor` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TipoMonto {
    /// Percentage points of the total price.
    #[default]
    Porcentaje,
    /// Absolute amount in the plan's currency.
    Valor,
}

impl TipoMonto {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoMonto::Porcentaje => "porcentaje",
            TipoMonto::Valor => "valor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TipoFinanciamiento {
    #[default]
    Bancario,
    Desarrollador,
    Otro,
}

impl TipoFinanciamiento {
    pub fn label(&self) -> &'static str {
        match self {
            TipoFinanciamiento::Bancario => "Bancario",
            TipoFinanciamiento::Desarrollador => "Con el desarrollador",
            TipoFinanciamiento::Otro => "Otro",
        }
    }
}

/// Reserve, separation and delivery-payment line items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ConceptoPlan {
    #[serde(default)]
    pub tipo: TipoMonto,
    #[serde(default)]
    pub valor: f64,
}

impl ConceptoPlan {
    pub fn porcentaje(valor: f64) -> Self {
        Self {
            tipo: TipoMonto::Porcentaje,
            valor,
        }
    }

    pub fn valor(valor: f64) -> Self {
        Self {
            tipo: TipoMonto::Valor,
            valor,
        }
    }
}

/// Upper bound for down-payment installments (thirty years of monthly payments).
pub const MAX_CUOTAS: u32 = 360;

fn una_cuota() -> u32 {
    1
}

/// Down payment, optionally split into installments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConceptoInicial {
    #[serde(default)]
    pub tipo: TipoMonto,
    #[serde(default)]
    pub valor: f64,
    #[serde(default = "una_cuota")]
    pub cuotas: u32,
}

impl Default for ConceptoInicial {
    fn default() -> Self {
        Self {
            tipo: TipoMonto::Porcentaje,
            valor: 0.0,
            cuotas: 1,
        }
    }
}

impl ConceptoInicial {
    pub fn concepto(&self) -> ConceptoPlan {
        ConceptoPlan {
            tipo: self.tipo,
            valor: self.valor,
        }
    }

    /// Installment count; zero is read as a single payment and the count never exceeds `MAX_CUOTAS`.
    pub fn cuotas_efectivas(&self) -> u32 {
        self.cuotas.clamp(1, MAX_CUOTAS)
    }
}

/// Financing is always a percentage of the total price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Financiamiento {
    #[serde(default)]
    pub tipo: TipoFinanciamiento,
    #[serde(default)]
    pub porcentaje: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plazo_meses: Option<u32>,
}

/// The five optional line items of a payment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanDetalle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserva: Option<ConceptoPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separacion: Option<ConceptoPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inicial: Option<ConceptoInicial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contra_entrega: Option<ConceptoPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financiamiento: Option<Financiamiento>,
}

impl PlanDetalle {
    /// Breakdown for a freshly started plan: every line item present and zero.
    pub fn nuevo() -> Self {
        Self {
            reserva: Some(ConceptoPlan::default()),
            separacion: Some(ConceptoPlan::default()),
            inicial: Some(ConceptoInicial::default()),
            contra_entrega: Some(ConceptoPlan::default()),
            financiamiento: Some(Financiamiento::default()),
        }
    }

    /// True when the down payment asks for more than `MAX_CUOTAS` installments.
    pub fn excede_cuotas(&self) -> bool {
        self.inicial.is_some_and(|i| i.cuotas > MAX_CUOTAS)
    }
}
