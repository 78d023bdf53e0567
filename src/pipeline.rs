// pipeline.rs
// Proposal states, Kanban stages and the stage-move command.

use std::future::Future;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Propuesta;
use crate::money::format_money;
use crate::purge::NivelLead;

/// Kanban columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EtapaPipeline {
    #[default]
    Prospecto,
    Contactado,
    Visita,
    Negociacion,
    Cierre,
    Perdido,
}

impl EtapaPipeline {
    pub const TODAS: [EtapaPipeline; 6] = [
        EtapaPipeline::Prospecto,
        EtapaPipeline::Contactado,
        EtapaPipeline::Visita,
        EtapaPipeline::Negociacion,
        EtapaPipeline::Cierre,
        EtapaPipeline::Perdido,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EtapaPipeline::Prospecto => "prospecto",
            EtapaPipeline::Contactado => "contactado",
            EtapaPipeline::Visita => "visita",
            EtapaPipeline::Negociacion => "negociacion",
            EtapaPipeline::Cierre => "cierre",
            EtapaPipeline::Perdido => "perdido",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EtapaPipeline::Prospecto => "Prospecto",
            EtapaPipeline::Contactado => "Contactado",
            EtapaPipeline::Visita => "Visita",
            EtapaPipeline::Negociacion => "Negociación",
            EtapaPipeline::Cierre => "Cierre",
            EtapaPipeline::Perdido => "Perdido",
        }
    }

    fn indice(&self) -> usize {
        match self {
            EtapaPipeline::Prospecto => 0,
            EtapaPipeline::Contactado => 1,
            EtapaPipeline::Visita => 2,
            EtapaPipeline::Negociacion => 3,
            EtapaPipeline::Cierre => 4,
            EtapaPipeline::Perdido => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EstadoPropuesta {
    #[default]
    Borrador,
    Enviada,
    Aceptada,
    Rechazada,
    Vencida,
}

impl EstadoPropuesta {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPropuesta::Borrador => "borrador",
            EstadoPropuesta::Enviada => "enviada",
            EstadoPropuesta::Aceptada => "aceptada",
            EstadoPropuesta::Rechazada => "rechazada",
            EstadoPropuesta::Vencida => "vencida",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EstadoPropuesta::Borrador => "Borrador",
            EstadoPropuesta::Enviada => "Enviada",
            EstadoPropuesta::Aceptada => "Aceptada",
            EstadoPropuesta::Rechazada => "Rechazada",
            EstadoPropuesta::Vencida => "Vencida",
        }
    }

    pub fn es_final(&self) -> bool {
        matches!(
            self,
            EstadoPropuesta::Aceptada | EstadoPropuesta::Rechazada | EstadoPropuesta::Vencida
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TarjetaPropuesta {
    pub id: String,
    pub titulo: String,
    pub contacto: String,
    pub precio: String,
    pub estado: EstadoPropuesta,
    pub purge_total: u8,
    pub nivel: NivelLead,
}

impl TarjetaPropuesta {
    pub fn desde(propuesta: &Propuesta) -> Option<Self> {
        let id = propuesta.id?;
        Some(Self {
            id: id.to_hex(),
            titulo: propuesta.titulo.clone(),
            contacto: propuesta.contacto.clone(),
            precio: format_money(Some(propuesta.precio_total), &propuesta.moneda),
            estado: propuesta.estado,
            purge_total: propuesta.purge.total(),
            nivel: propuesta.purge.nivel(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnaKanban {
    pub etapa: EtapaPipeline,
    pub titulo: &'static str,
    pub tarjetas: Vec<TarjetaPropuesta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableroKanban {
    pub columnas: Vec<ColumnaKanban>,
}

impl TableroKanban {
    pub fn vacio() -> Self {
        Self {
            columnas: EtapaPipeline::TODAS
                .iter()
                .map(|etapa| ColumnaKanban {
                    etapa: *etapa,
                    titulo: etapa.label(),
                    tarjetas: Vec::new(),
                })
                .collect(),
        }
    }

    /// Groups proposals by stage, keeping their relative order.
    pub fn desde<'a, I>(propuestas: I) -> Self
    where
        I: IntoIterator<Item = &'a Propuesta>,
    {
        let mut tablero = Self::vacio();
        for propuesta in propuestas {
            if let Some(tarjeta) = TarjetaPropuesta::desde(propuesta) {
                tablero.columnas[propuesta.etapa.indice()]
                    .tarjetas
                    .push(tarjeta);
            }
        }
        tablero
    }

    pub fn columna(&self, etapa: EtapaPipeline) -> &ColumnaKanban {
        &self.columnas[etapa.indice()]
    }

    /// Current (stage, index) of a card.
    pub fn ubicar(&self, id: &str) -> Option<(EtapaPipeline, usize)> {
        self.columnas.iter().find_map(|col| {
            col.tarjetas
                .iter()
                .position(|t| t.id == id)
                .map(|pos| (col.etapa, pos))
        })
    }

    fn quitar(&mut self, etapa: EtapaPipeline, pos: usize) -> TarjetaPropuesta {
        self.columnas[etapa.indice()].tarjetas.remove(pos)
    }

    fn insertar(&mut self, etapa: EtapaPipeline, pos: usize, tarjeta: TarjetaPropuesta) {
        let tarjetas = &mut self.columnas[etapa.indice()].tarjetas;
        let pos = pos.min(tarjetas.len());
        tarjetas.insert(pos, tarjeta);
    }
}

/// Persists a proposal's stage; implemented by the storage layer.
pub trait RepositorioEtapas {
    fn guardar_etapa(
        &self,
        id: &str,
        etapa: EtapaPipeline,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Moves a card to `hacia`, persisting through `repo`.
///
/// The board is updated before the write; if the write fails the card is put
/// back at its previous column and position and the error is returned.
pub async fn mover_tarjeta<R>(
    tablero: &mut TableroKanban,
    id: &str,
    hacia: EtapaPipeline,
    repo: &R,
) -> Result<()>
where
    R: RepositorioEtapas + Sync,
{
    let Some((desde, pos)) = tablero.ubicar(id) else {
        bail!("propuesta {id} no está en el tablero");
    };
    if desde == hacia {
        return Ok(());
    }

    let tarjeta = tablero.quitar(desde, pos);
    let destino = tablero.columna(hacia).tarjetas.len();
    tablero.insertar(hacia, destino, tarjeta);

    match repo.guardar_etapa(id, hacia).await {
        Ok(()) => {
            info!(propuesta = id, desde = desde.as_str(), hacia = hacia.as_str(), "stage moved");
            Ok(())
        }
        Err(err) => {
            warn!(propuesta = id, error = %err, "stage move failed; rolling back");
            let tarjeta = tablero.quitar(hacia, destino);
            tablero.insertar(desde, pos, tarjeta);
            Err(err)
        }
    }
}
