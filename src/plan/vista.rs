// plan/vista.rs
// Display-ready view of a plan: totals, formatted amounts and schedule.

use chrono::NaiveDate;
use serde::Serialize;

use crate::money::{decimals_for, format_money, format_percent};

use super::calculo::{Cobertura, ResumenPlan, resumir};
use super::cuotas::{Cuota, cronograma_inicial};
use super::detalle::PlanDetalle;

#[derive(Debug, Clone, Serialize)]
pub struct MontosFormateados {
    pub precio_total: String,
    pub reserva: String,
    pub separacion: String,
    pub inicial: String,
    pub cuota_inicial: Option<String>,
    pub contra_entrega: String,
    pub financiamiento: String,
    pub total: String,
    pub porcentaje_total: String,
    pub diferencia: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VistaPlan {
    pub precio_total: f64,
    pub moneda: String,
    pub detalle: PlanDetalle,
    pub resumen: Option<ResumenPlan>,
    pub formateado: Option<MontosFormateados>,
    pub cobertura: Option<Cobertura>,
    pub cronograma_inicial: Vec<Cuota>,
}

impl VistaPlan {
    pub fn construir(
        precio_total: f64,
        moneda: &str,
        detalle: PlanDetalle,
        primera_cuota: NaiveDate,
    ) -> Self {
        let resumen = resumir(&detalle, precio_total);
        let formateado = resumen.as_ref().map(|r| formatear(r, precio_total, moneda));
        let cobertura = resumen.as_ref().map(ResumenPlan::cobertura);
        let cronograma = match resumen.as_ref() {
            Some(r) if r.cuotas_inicial > 1 => cronograma_inicial(
                r.inicial,
                r.cuotas_inicial,
                primera_cuota,
                decimals_for(moneda),
            ),
            _ => Vec::new(),
        };

        Self {
            precio_total,
            moneda: moneda.to_string(),
            detalle,
            resumen,
            formateado,
            cobertura,
            cronograma_inicial: cronograma,
        }
    }
}

fn formatear(r: &ResumenPlan, precio_total: f64, moneda: &str) -> MontosFormateados {
    let fmt = |v: f64| format_money(Some(v), moneda);
    MontosFormateados {
        precio_total: fmt(precio_total),
        reserva: fmt(r.reserva),
        separacion: fmt(r.separacion),
        inicial: fmt(r.inicial),
        cuota_inicial: r.cuota_inicial.map(fmt),
        contra_entrega: fmt(r.contra_entrega),
        financiamiento: fmt(r.financiamiento),
        total: fmt(r.total),
        porcentaje_total: format_percent(r.porcentaje_total),
        diferencia: fmt(r.diferencia.abs()),
    }
}
