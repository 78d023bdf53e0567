// plan/cuotas.rs
// Monthly schedule for a down payment split into installments.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::money::round_to;

use super::detalle::MAX_CUOTAS;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cuota {
    pub numero: u32,
    pub fecha: NaiveDate,
    pub monto: f64,
}

/// Splits `monto` into `cuotas` monthly installments starting on `primera_fecha`.
/// The count is kept within `1..=MAX_CUOTAS`.
///
/// Every installment is rounded to `decimales`; the last one takes the
/// remainder so the schedule adds up to `monto` at that precision.
pub fn cronograma_inicial(
    monto: f64,
    cuotas: u32,
    primera_fecha: NaiveDate,
    decimales: u32,
) -> Vec<Cuota> {
    let cuotas = cuotas.clamp(1, MAX_CUOTAS);
    let total = round_to(monto, decimales);
    let base = round_to(total / cuotas as f64, decimales);

    let mut asignado = 0.0;
    (0..cuotas)
        .map(|i| {
            let monto = if i + 1 == cuotas {
                round_to(total - asignado, decimales)
            } else {
                asignado += base;
                base
            };
            Cuota {
                numero: i + 1,
                fecha: fecha_cuota(primera_fecha, i),
                monto,
            }
        })
        .collect()
}

fn fecha_cuota(primera: NaiveDate, offset: u32) -> NaiveDate {
    // checked_add_months clamps to the last day of shorter months
    primera
        .checked_add_months(Months::new(offset))
        .unwrap_or(NaiveDate::MAX)
}
