// plan/editor.rs
// Editing session over a single plan; totals are re-derived after every change.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calculo::{ResumenPlan, resumir};
use super::detalle::{
    ConceptoInicial, ConceptoPlan, Financiamiento, MAX_CUOTAS, PlanDetalle, TipoFinanciamiento,
    TipoMonto,
};

/// Line items that accept either a percentage or a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampoConcepto {
    Reserva,
    Separacion,
    Inicial,
    ContraEntrega,
}

/// One user edit, as sent by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "campo", content = "valor", rename_all = "snake_case")]
pub enum CambioPlan {
    PrecioTotal(f64),
    Moneda(String),
    Tipo {
        concepto: CampoConcepto,
        tipo: TipoMonto,
    },
    Valor {
        concepto: CampoConcepto,
        valor: f64,
    },
    Cuotas(u32),
    TipoFinanciamiento(TipoFinanciamiento),
    PorcentajeFinanciamiento(f64),
    PlazoMeses(Option<u32>),
}

#[derive(Debug, Clone)]
pub struct EditorPlan {
    precio_total: f64,
    moneda: String,
    detalle: PlanDetalle,
    resumen: Option<ResumenPlan>,
}

impl EditorPlan {
    pub fn new(precio_total: f64, moneda: impl Into<String>, detalle: PlanDetalle) -> Self {
        let resumen = resumir(&detalle, precio_total);
        Self {
            precio_total,
            moneda: moneda.into(),
            detalle,
            resumen,
        }
    }

    /// Starts a plan with every line item at zero.
    pub fn nuevo(precio_total: f64, moneda: impl Into<String>) -> Self {
        Self::new(precio_total, moneda, PlanDetalle::nuevo())
    }

    pub fn precio_total(&self) -> f64 {
        self.precio_total
    }

    pub fn moneda(&self) -> &str {
        &self.moneda
    }

    pub fn detalle(&self) -> &PlanDetalle {
        &self.detalle
    }

    pub fn resumen(&self) -> Option<&ResumenPlan> {
        self.resumen.as_ref()
    }

    pub fn into_parts(self) -> (f64, String, PlanDetalle) {
        (self.precio_total, self.moneda, self.detalle)
    }

    pub fn aplicar(&mut self, cambio: CambioPlan) -> Option<&ResumenPlan> {
        debug!(?cambio, "applying plan change");
        match cambio {
            CambioPlan::PrecioTotal(precio) => self.precio_total = precio,
            CambioPlan::Moneda(moneda) => {
                // blank keeps the current currency
                let moneda = moneda.trim();
                if !moneda.is_empty() {
                    self.moneda = moneda.to_uppercase();
                }
            }
            CambioPlan::Tipo { concepto, tipo } => self.set_tipo(concepto, tipo),
            CambioPlan::Valor { concepto, valor } => self.set_valor(concepto, valor),
            CambioPlan::Cuotas(cuotas) => {
                self.inicial_mut().cuotas = cuotas.clamp(1, MAX_CUOTAS);
            }
            CambioPlan::TipoFinanciamiento(tipo) => self.financiamiento_mut().tipo = tipo,
            CambioPlan::PorcentajeFinanciamiento(porcentaje) => {
                self.financiamiento_mut().porcentaje = porcentaje
            }
            CambioPlan::PlazoMeses(plazo) => self.financiamiento_mut().plazo_meses = plazo,
        }
        self.resumen = resumir(&self.detalle, self.precio_total);
        self.resumen.as_ref()
    }

    pub fn aplicar_todos<I>(&mut self, cambios: I) -> Option<&ResumenPlan>
    where
        I: IntoIterator<Item = CambioPlan>,
    {
        for cambio in cambios {
            self.aplicar(cambio);
        }
        self.resumen.as_ref()
    }

    fn set_tipo(&mut self, concepto: CampoConcepto, tipo: TipoMonto) {
        *self.campos_mut(concepto).0 = tipo;
    }

    fn set_valor(&mut self, concepto: CampoConcepto, valor: f64) {
        *self.campos_mut(concepto).1 = valor;
    }

    fn campos_mut(&mut self, concepto: CampoConcepto) -> (&mut TipoMonto, &mut f64) {
        let item = match concepto {
            CampoConcepto::Inicial => {
                let inicial = self.inicial_mut();
                return (&mut inicial.tipo, &mut inicial.valor);
            }
            CampoConcepto::Reserva => &mut self.detalle.reserva,
            CampoConcepto::Separacion => &mut self.detalle.separacion,
            CampoConcepto::ContraEntrega => &mut self.detalle.contra_entrega,
        };
        let item = item.get_or_insert_with(ConceptoPlan::default);
        (&mut item.tipo, &mut item.valor)
    }

    fn inicial_mut(&mut self) -> &mut ConceptoInicial {
        self.detalle
            .inicial
            .get_or_insert_with(ConceptoInicial::default)
    }

    fn financiamiento_mut(&mut self) -> &mut Financiamiento {
        self.detalle
            .financiamiento
            .get_or_insert_with(Financiamiento::default)
    }
}
