use chrono::NaiveDate;
use sales_dashboard_series::*;

fn main() -> Result<()> {
    println!("📊 Target vs Actual Demo\n");

    let props = r#"{"data": [
        {"year": 2023, "month": 11, "business_unit_id": 1, "target": 1200000000, "actual": 950000000},
        {"year": 2023, "month": 12, "business_unit_id": 1, "target": 1200000000, "actual": 1400000000},
        {"year": 2024, "month": 1, "business_unit_id": 1, "target": 1500000000, "actual": 1350000000,
         "amount": 420000000, "status": "Approved", "customer": "PT Maju Jaya"},
        {"year": 2024, "month": 1, "business_unit_id": 2, "target": 800000000, "actual": 910000000,
         "amount": 180000000, "status": "Pending", "customer": "CV Sentosa"},
        {"year": 2024, "month": 2, "business_unit_id": 1, "target": 1500000000, "actual": 1620000000,
         "amount": 95000000, "status": "Approved", "customer": "PT Maju Jaya"},
        {"year": 2024, "month": 2, "business_unit_id": 2, "target": 800000000,
         "amount": 60000000, "status": "Rejected", "customer": "UD Abadi"}
    ]}"#;

    let records = records_from_json(props)?;
    let today = NaiveDate::from_ymd_opt(2024, 2, 20)
        .ok_or_else(|| DashboardSeriesError::InvalidPeriod("2024-02-20".to_string()))?;

    let config = PipelineConfig {
        cumulative: Some(CumulativeScope::PerYear),
        number_format: NumberLocale::Indonesian,
        ..PipelineConfig::default()
    };
    let pipeline = SeriesPipeline::new(config);

    let selection = FilterSelection::all()
        .with_period(PeriodFilter::LastNMonths { months: 6 })
        .with_value_type(ValueType::Actual);
    let data = pipeline.run(&records, &selection, today)?;

    let strategy = pipeline.config().number_format.strategy();
    println!("{:<10} {:>14} {:>14} {:>8} {:>10}", "Period", "Target", "Actual", "%", "Cum %");
    for point in &data.series.points {
        println!(
            "{:<10} {:>14} {:>14} {:>8.2} {:>10}",
            point.period,
            strategy.format(point.target),
            strategy.format(point.actual),
            point.percentage,
            point
                .cumulative_percentage
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_default(),
        );
    }

    println!(
        "\nTotal: {} of {} ({:.2}%)",
        strategy.format(data.total_actual),
        strategy.format(data.total_target),
        data.total_percentage
    );

    println!("\nPurchase orders by status:");
    for row in &data.status_breakdown {
        println!("  {:<10} {:>3}  {}", row.status, row.count, strategy.format(row.amount));
    }

    println!("\nTop customers:");
    for (rank, customer) in data.top_customers.iter().enumerate() {
        println!(
            "  {}. {:<14} {}",
            rank + 1,
            customer.customer,
            ThresholdFormat::compact().format(customer.amount)
        );
    }

    let unit_only = selection.with_business_unit("2");
    let series = pipeline.series(&records, &unit_only, today)?;
    if series.no_data {
        println!("\nBusiness unit 2: no data");
    } else {
        println!("\nBusiness unit 2 periods: {}", series.labels().join(", "));
    }

    Ok(())
}
