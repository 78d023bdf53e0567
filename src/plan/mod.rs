// plan module: payment-plan model, calculator, installment schedule and editor.

pub mod calculo;
pub mod cuotas;
pub mod detalle;
pub mod editor;
mod vista;

pub use calculo::{Cobertura, ResumenPlan, calcular_financiamiento, calcular_monto, cuota_inicial, resumir};
pub use cuotas::{Cuota, cronograma_inicial};
pub use detalle::{
    ConceptoInicial, ConceptoPlan, Financiamiento, MAX_CUOTAS, PlanDetalle, TipoFinanciamiento,
    TipoMonto,
};
pub use editor::{CambioPlan, CampoConcepto, EditorPlan};
pub use vista::{MontosFormateados, VistaPlan};
