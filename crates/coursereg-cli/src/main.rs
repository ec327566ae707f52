use coursereg_cli::admin::create_admin;
use coursereg_cli::seeder::{self, SeedConfig};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "coursereg-cli")]
#[command(about = "Course registration CLI - administrative and seeding tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Full name of the administrator
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake departments, people, courses and sections
    Seed {
        /// Number of departments to create
        #[arg(short = 'd', long, default_value = "4")]
        departments: usize,

        /// Number of courses per department
        #[arg(long, default_value = "6")]
        courses: usize,

        /// Number of lecturers per department
        #[arg(long, default_value = "4")]
        lecturers: usize,

        /// Number of students per department
        #[arg(long, default_value = "50")]
        students: usize,

        /// Number of class sections per course
        #[arg(long, default_value = "2")]
        sections: usize,
    },
    /// Remove all seeded data (keeps manually created records)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::Seed {
            departments,
            courses,
            lecturers,
            students,
            sections,
        } => {
            let config = SeedConfig {
                departments,
                courses_per_department: courses,
                lecturers_per_department: lecturers,
                students_per_department: students,
                sections_per_course: sections,
            };
            if let Err(e) = seeder::seed_all(&pool, config).await {
                eprintln!("\n❌ Error seeding database: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&pool).await {
                eprintln!("\n❌ Error clearing seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Full name")
            .interact_text()
            .expect("Failed to read name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_admin(pool, &name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Administrator created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {}", e);
            std::process::exit(1);
        }
    }
}
