//! Admin statistics.

use agenda_client::AdminStats;
use agenda_session::Requirement;
use anyhow::Result;

use crate::commands::app::App;
use crate::commands::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Section {
    Inscricoes,
    Eventos,
    Usuarios,
}

pub async fn show(app: &App, section: Option<Section>) -> Result<()> {
    app.require(Requirement::Admin).await?;
    let stats = app.api.stats();
    match section {
        Some(Section::Inscricoes) => output::json(&stats.registrations().await?),
        Some(Section::Eventos) => output::json(&stats.events().await?),
        Some(Section::Usuarios) => output::json(&stats.users().await?),
        None => {
            let overview = stats.overview().await?;
            if app.output.is_json() {
                return output::json(&overview);
            }
            print_overview(&overview);
            Ok(())
        }
    }
}

fn print_overview(s: &AdminStats) {
    println!("Eventos:    {}", s.total_eventos);
    let st = &s.eventos_por_status;
    println!(
        "  pendentes {} / aprovados {} / rejeitados {} / cancelados {}",
        st.pending, st.approved, st.rejected, st.cancelled
    );
    println!("Inscrições: {}", s.total_inscritos);
    println!("Usuários:   {} ({} ativos)", s.total_usuarios, s.total_usuarios_ativos);
    println!(
        "Promoters:  {} ({} aprovados, {} pendentes)",
        s.total_promoters, s.promoters_aprovados, s.promoters_pendentes
    );
    println!(
        "Aprovação:  eventos {:.1}% / promoters {:.1}%",
        s.taxa_aceitacao.eventos.taxa_aprovacao, s.taxa_aceitacao.promoters.taxa_aprovacao
    );
    if !s.locais_mais_populares.is_empty() {
        println!();
        println!("{:32} {:>8} {:>10}", "LOCAL", "EVENTOS", "INSCRITOS");
        for l in &s.locais_mais_populares {
            println!("{:32} {:>8} {:>10}", l.localizacao, l.total_eventos, l.total_inscritos);
        }
    }
    if !s.eventos_por_mes.is_empty() {
        println!();
        println!("{:10} {:>6} {:>10} {:>10}", "MES", "TOTAL", "APROVADOS", "PENDENTES");
        for m in &s.eventos_por_mes {
            println!("{:10} {:>6} {:>10} {:>10}", m.mes, m.total, m.aprovados, m.pendentes);
        }
    }
}
