use clap::Args;
use hunt_timer_core::{
    format_duration, format_percent, parse_percent, plan, Config, DerivationStrategy,
    ExperienceSample, HuntPlan, InsufficientData, KillRateSource, RateObservation, Result,
    SamplingWindow,
};
use serde_json::json;

/// Measurements shared by `estimate` and the timer commands.
#[derive(Args, Debug, Default)]
pub struct RateArgs {
    /// Item drop rate in percent (e.g. "0.006" or "0.006%")
    #[arg(long)]
    pub drop_rate: Option<String>,
    /// Kills counted in the sampling window
    #[arg(long, conflicts_with_all = ["xp_gained", "xp_before", "xp_after"])]
    pub kills: Option<f64>,
    /// Experience gained in the sampling window
    #[arg(long, conflicts_with_all = ["xp_before", "xp_after"])]
    pub xp_gained: Option<f64>,
    /// Experience bar at the start of the window
    #[arg(long, requires = "xp_after")]
    pub xp_before: Option<f64>,
    /// Experience bar at the end of the window
    #[arg(long, requires = "xp_before")]
    pub xp_after: Option<f64>,
    /// Experience per kill of the hunted monster
    #[arg(long)]
    pub xp_per_kill: Option<f64>,
    /// Sampling window in minutes (defaults to the configured window)
    #[arg(long)]
    pub window: Option<u32>,
}

impl RateArgs {
    pub fn has_drop_rate(&self) -> bool {
        self.drop_rate.is_some()
    }

    fn source(&self, config: &Config) -> Result<KillRateSource, InsufficientData> {
        let window = match self.window {
            Some(minutes) => SamplingWindow::minutes(minutes)?,
            None => config.estimator.sampling_window,
        };

        let experience = match (self.xp_gained, self.xp_before, self.xp_after) {
            (Some(gained), _, _) => Some(gained),
            (None, Some(before), Some(after)) => Some(after - before),
            _ => None,
        };

        match (self.kills, experience) {
            (Some(kills), _) => Ok(KillRateSource::Direct { kills, window }),
            (None, Some(gained)) => Ok(KillRateSource::Experience {
                sample: ExperienceSample::new(gained, self.xp_per_kill.unwrap_or(0.0)),
                window,
            }),
            // Nothing measured yet: report what the configured strategy needs.
            (None, None) => match config.estimator.derivation {
                DerivationStrategy::Direct => Err(InsufficientData::NoKills),
                DerivationStrategy::Experience => Err(InsufficientData::ExperienceGained(0.0)),
            },
        }
    }

    pub fn plan(&self, config: &Config) -> Result<HuntPlan, InsufficientData> {
        let p = self
            .drop_rate
            .as_deref()
            .and_then(parse_percent)
            .unwrap_or(0.0);
        RateObservation::new(p, 1.0).validate()?;
        plan(&config.estimator, p, &self.source(config)?)
    }
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub rate: RateArgs,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: EstimateArgs) -> Result<()> {
    let config = Config::load_or_default();
    match args.rate.plan(&config) {
        Ok(hunt) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&hunt)?);
            } else {
                print_plan(&hunt);
            }
        }
        Err(missing) => {
            if args.json {
                let body = json!({ "status": "insufficient_data", "reason": missing.to_string() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("정보를 입력해 주세요. ({missing})");
            }
        }
    }
    Ok(())
}

fn print_plan(hunt: &HuntPlan) {
    let r = &hunt.estimate;
    let window = hunt.kill_rate.window.as_minutes();
    println!("기대 사냥 마리 수      {}", r.expected_kills);
    println!("{window}분 사냥 마리 수       {}", hunt.kill_rate.kills_per_window);
    println!("1시간 사냥 마리 수     {:.0}", r.kills_per_hour);
    println!("예상 소요 시간         {}", format_duration(r.seconds_to_expected));
    println!("90% 확률 소요 시간     {}", format_duration(r.seconds_to_90_percent));
    for m in &r.milestones {
        println!(
            "{:>6} 확률           {}마리 / {}",
            format_percent(m.target),
            m.kills,
            format_duration(m.seconds)
        );
    }
    println!(
        "{}마리를 잡았을 때 아이템을 얻을 확률은 약 {}입니다.",
        r.expected_kills,
        format_percent(r.probability_at_expected)
    );
}
