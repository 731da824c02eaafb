use itime::{Bucket, TimeValue};

fn main() -> itime::Result<()> {
    let now = TimeValue::now();
    let bucket = now.downsample(Bucket::new().minutes(5))?;
    let epoch = TimeValue::from_input(1_617_531_792_000_i64, true)?;

    println!("now:           {now}");
    println!("5-min bucket:  {bucket}");
    println!("today:         {}", TimeValue::today().date_string("/"));
    println!("from epoch ms: {}", epoch.combined_string("", ""));
    println!("in 90 minutes: {}", now.shifted_by(0, 0, 90, 0)?.time_string(":"));
    Ok(())
}
