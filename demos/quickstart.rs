use chrono::Local;
use miqat::{Coordinates, DstSpec, Method, PrayerTimes, TimeFormat, TimeZoneSpec};

fn main() {
    let engine = PrayerTimes::new(Method::MWL);
    let today = Local::now().date_naive();
    let abuja = Coordinates::new(9.072264, 7.491302);

    let times = engine.times(
        today,
        abuja,
        TimeZoneSpec::Auto,
        DstSpec::Auto,
        Some(TimeFormat::Hours24),
    );

    println!("{} ({today})", engine.method().definition().name);
    for (name, time) in times.iter() {
        println!("{:<9} {time}", name.label());
    }
}
