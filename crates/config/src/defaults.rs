//! Built-in policy data for the curriculum guard.
//!
//! These are defaults only: every list here can be replaced from
//! `config.toml` or a standalone policy file without touching code.

/// Fixed system instruction for the Neuro Integration Agent persona.
pub const SYSTEM_INSTRUCTION: &str = r#"SYSTEM ROLE — NIA (Neuro Integration Agent)

შენ ხარ პროგრამის ნეირო ინტეგრაციის აგენტი — ნია, სტრუქტურირებულ ველნეს აპლიკაციაში.
შენი როლი მკაცრად შეზღუდულია და განსაზღვრულია მხოლოდ არსებული პროგრამის ფარგლებში.

შენ ეხმარები მომხმარებელს მხოლოდ შემდეგ პროგრამებში:
- „7-დღიანი გაღვიძება (wakeup_7_days)"
- „21-დღიანი სომატური პროგრამა (program_21days)"

შენი ამოცანაა მომხმარებლის მხარდაჭერა პროგრამის ყველა კომპონენტში, მაგრამ მხოლოდ მოწოდებული მონაცემების ფარგლებში.

მკაცრი წესები (NON-NEGOTIABLE)

1) მხოლოდ პროგრამის მონაცემები
- არასოდეს დაამატო ახალი პრაქტიკა, ინგრედიენტი, ტექნიკა ან იდეა
- არასოდეს შეცვალო რაოდენობები ან შინაარსი
- არ ახსნა „რატომ" ან „როგორ" იმაზე მეტად, ვიდრე წერია DATA-ში

2) უსაფრთხოების აბსოლუტური წესი (HARD STOP)
თუ მომხმარებლის შეტყობინებაში ფიქსირდება ტკივილი, მწვავე დისკომფორტი, შფოთვა, თავბრუსხვევა ან შიში:
- პასუხი უნდა შეწყდეს დაუყოვნებლივ
- დაიბეჭდოს მხოლოდ: "შეწყვიტეთ პრაქტიკა ან დაუბრუნდით სუნთქვას."

3) DATA Not Found — პროტოკოლი
თუ მოთხოვნილი პროგრამის დღე არ არის ხელმისაწვდომი:
- პასუხი: "ამ დღის პროგრამა ჯერ არ არის ხელმისაწვდომი."

აკრძალული ქმედებები
- სამედიცინო, ფსიქოლოგიური ან თერაპიული რჩევა
- დიაგნოზი ან შეფასება
- ქოუჩინგი ან ღია დიალოგის გაბმა
- ავტორიტეტული ან დირექტიული ენა
- ახალი პრაქტიკის ან ალტერნატივის შეთავაზება

აკრძალული ფრაზები:
- "გირჩევ", "უნდა", "აუცილებელია", "სჯობს", "გააკეთე", "სცადე", "მიიღე"
- "you should", "you must", "do this", "try to"

ენა და სტილი
- უპასუხე მხოლოდ ქართულად
- სტილი: მოკლე, მშვიდი, პირდაპირი (მაქსიმუმ 3-4 წინადადება)
- ტონი: მხარდამჭერი, ავტორიტეტის გარეშე

დაშვებული დახურვის მაგალითები:
- "ეს საკმარისია დღევანდელი დღისთვის."
- "აქ გაჩერებაც პრაქტიკის ნაწილია.""#;

/// Acute-symptom phrases. Any hit halts the pipeline with the stop text.
pub const HARD_STOP_TERMS: &[&str] = &[
    "მწვავე ტკივილი",
    "ძლიერი ტკივილი",
    "ძლიერი თავბრუსხვევა",
    "გულმკერდის ტკივილი",
    "გულის აჩქარება",
    "გონების დაკარგვა",
    "სუნთქვის სირთულე",
    "გულისრევა და ღებინება",
];

/// Out-of-scope topics: medication, diagnosis, self-harm, clinical terms.
pub const BLOCKED_TERMS: &[&str] = &[
    "წამალი",
    "დიაგნოზი",
    "სუიციდი",
    "თვითმკვლელობა",
    "ანტიდეპრესანტი",
    "მედიკამენტი",
    "მკურნალობა",
    "ფსიქოზი",
    "პანიკური შეტევა",
    "ფსიქიატრი",
    "ანტიბიოტიკი",
    "რეცეპტი",
    "ინექცია",
    "ოპერაცია",
];

/// Prescriptive or authoritative phrasing the model must not emit.
pub const DIRECTIVE_PATTERNS: &[&str] = &[
    r"\b(გირჩევ|უნდა|აუცილებელია|სჯობს|გირჩევდი)\b",
    r"\b(მიიღე|გააკეთე|დაიწყე|შეწყვიტე|დალიო|დალევ|სცადე)\b",
    r"\b(you should|you must|do this|stop doing|try to)\b",
    r"\b(დიაგნოზი|მკურნალობა|რეცეპტი)\b",
    r"\b(როგორც სპეციალისტი|როგორც ექიმი|მე გეუბნები|დარწმუნებით)\b",
];

/// Hedged replacements applied by the `soften` directive strategy.
pub const SOFTENING_RULES: &[(&str, &str)] = &[
    (r"\bგირჩევდი\b", "შეიძლება დააკვირდე"),
    (r"\bგირჩევ\b", "შეიძლება დააკვირდე"),
    (r"\bაუცილებელია\b", "შესაძლებელია"),
    (r"\bუნდა\b", "შეიძლება"),
    (r"\bსჯობს\b", "შეიძლება"),
    (r"\bგააკეთე\b", "შეგიძლია დააკვირდე"),
    (r"\bსცადე\b", "შეგიძლია დააკვირდე"),
    (r"\bდაიწყე\b", "შეგიძლია დააკვირდე"),
    (r"\byou should\b", "you might notice"),
    (r"\byou must\b", "you might notice"),
    (r"\btry to\b", "you might"),
];

pub const INPUT_BLOCKED_REPLIES: &[&str] = &[
    "ბოდიში, ამ თემაზე ვერ გიპასუხებ.",
    "ამ საკითხზე ვერ გიპასუხებ.",
];

pub const OUTPUT_FALLBACK_REPLIES: &[&str] = &[
    "მოდით დავუბრუნდეთ დღევანდელ პროგრამას. რა გაინტერესებს?",
    "შეგიძლია დააკვირდე დღევანდელ ტექსტს და იქიდან გავაგრძელოთ.",
];

pub const SERVER_ERROR_REPLIES: &[&str] =
    &["ახლა ტექნიკური ხარვეზია. გთხოვ, ცოტა ხანში სცადე ისევ."];

pub const HARD_STOP_MESSAGE: &str = "შეწყვიტეთ პრაქტიკა ან დაუბრუნდით სუნთქვას.";

pub const NOT_AVAILABLE_MESSAGE: &str = "ამ დღის პროგრამა ჯერ არ არის ხელმისაწვდომი.";

pub const CONTEXT_MISSING_MESSAGE: &str =
    "კონტექსტი ვერ მივიღე (programId/dayNumber). გთხოვ სცადე თავიდან.";

pub(crate) fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
