// plan/calculo.rs
// Line-item amounts and plan totals derived from a PlanDetalle.

use serde::Serialize;

use super::detalle::{ConceptoPlan, Financiamiento, PlanDetalle, TipoMonto};

/// Differences smaller than half a cent count as an exact cover.
pub const TOLERANCIA_COBERTURA: f64 = 0.005;

/// Monetary contribution of a single line item.
///
/// Percentage items contribute nothing until a positive price exists;
/// fixed amounts are returned as-is whatever the price.
pub fn calcular_monto(item: Option<&ConceptoPlan>, precio_total: f64) -> f64 {
    let Some(item) = item else {
        return 0.0;
    };
    match item.tipo {
        TipoMonto::Porcentaje => {
            if precio_total > 0.0 {
                precio_total * item.valor / 100.0
            } else {
                0.0
            }
        }
        TipoMonto::Valor => item.valor,
    }
}

pub fn calcular_financiamiento(item: Option<&Financiamiento>, precio_total: f64) -> f64 {
    match item {
        Some(f) if precio_total > 0.0 => precio_total * f.porcentaje / 100.0,
        _ => 0.0,
    }
}

/// Derived totals of a plan for a given price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumenPlan {
    pub reserva: f64,
    pub separacion: f64,
    pub inicial: f64,
    pub contra_entrega: f64,
    pub financiamiento: f64,
    pub total: f64,
    pub porcentaje_total: f64,
    /// `precio_total - total`: positive is a shortfall, negative an excess.
    pub diferencia: f64,
    pub cuotas_inicial: u32,
    /// Per-installment down payment, only when split in more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuota_inicial: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "estado", content = "monto", rename_all = "lowercase")]
pub enum Cobertura {
    Completa,
    Faltante(f64),
    Excedente(f64),
}

impl Cobertura {
    pub fn mensaje(&self) -> &'static str {
        match self {
            Cobertura::Completa => "El plan cubre el precio total",
            Cobertura::Faltante(_) => "Falta por cubrir",
            Cobertura::Excedente(_) => "El plan excede el precio total por",
        }
    }
}

impl ResumenPlan {
    pub fn cobertura(&self) -> Cobertura {
        if self.diferencia.abs() < TOLERANCIA_COBERTURA {
            Cobertura::Completa
        } else if self.diferencia > 0.0 {
            Cobertura::Faltante(self.diferencia)
        } else {
            Cobertura::Excedente(-self.diferencia)
        }
    }
}

/// Aggregates every line item of `detalle` against `precio_total`.
///
/// Returns `None` when there is no positive price to measure against.
pub fn resumir(detalle: &PlanDetalle, precio_total: f64) -> Option<ResumenPlan> {
    if !(precio_total > 0.0) {
        return None;
    }

    let reserva = calcular_monto(detalle.reserva.as_ref(), precio_total);
    let separacion = calcular_monto(detalle.separacion.as_ref(), precio_total);
    let inicial_concepto = detalle.inicial.map(|i| i.concepto());
    let inicial = calcular_monto(inicial_concepto.as_ref(), precio_total);
    let contra_entrega = calcular_monto(detalle.contra_entrega.as_ref(), precio_total);
    let financiamiento = calcular_financiamiento(detalle.financiamiento.as_ref(), precio_total);

    let total = reserva + separacion + inicial + contra_entrega + financiamiento;
    let cuotas_inicial = detalle
        .inicial
        .map(|i| i.cuotas_efectivas())
        .unwrap_or(1);

    Some(ResumenPlan {
        reserva,
        separacion,
        inicial,
        contra_entrega,
        financiamiento,
        total,
        porcentaje_total: total / precio_total * 100.0,
        diferencia: precio_total - total,
        cuotas_inicial,
        cuota_inicial: cuota_inicial(inicial, cuotas_inicial),
    })
}

/// Down-payment installment amount, unrounded.
pub fn cuota_inicial(monto_inicial: f64, cuotas: u32) -> Option<f64> {
    if cuotas > 1 {
        Some(monto_inicial / cuotas as f64)
    } else {
        None
    }
}
